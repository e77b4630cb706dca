//! Locales, the localized route table and UI strings.
//!
//! The default locale is served without a prefix; every other locale lives
//! under `/{code}`. Mapping a URL to another locale goes through the static
//! route table first, then the project detail pattern, and finally falls
//! back to the target locale's home page.

mod locale;
pub mod messages;
mod routes;

pub use locale::{Locale, UnknownLocale};
pub use messages::Message;
pub use routes::{
    alternates, canonical_url, detect_language_from_path, get_base_path_without_language,
    get_equivalent_url, parse_project_path, project_segment, project_url, route_for_path,
    strip_locale_suffix, Alternate, RouteKey,
};
