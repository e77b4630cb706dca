//! Well-known state keys shared between scripts.

use serde_json::Value;

use super::state::StateKey;
use crate::i18n::Locale;

/// Colour theme chosen by the visitor. Persistent.
pub const THEME: StateKey<String> = StateKey::new("theme");
/// Active locale of the current page. Persistent.
pub const LOCALE: StateKey<Locale> = StateKey::new("locale");
/// Opaque visitor preferences blob. Persistent.
pub const USER_PREFERENCES: StateKey<Value> = StateKey::new("user-preferences");

/// Raised when a pointer drag on a pill row ends, so the click the browser
/// synthesizes right after it is not treated as a pill toggle.
pub const FILTER_DRAG_EVENT: StateKey<bool> =
    StateKey::namespaced("filter", "is-drag-event");
/// Tags currently active in the project filter.
pub const ACTIVE_FILTERS: StateKey<Vec<String>> =
    StateKey::namespaced("filter", "active");
/// Current slide index per slider id.
pub const SLIDER_INDEX: StateKey<(String, usize)> =
    StateKey::namespaced("slider", "current");
