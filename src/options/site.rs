use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Public site identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Site", inline)]
#[serde(default)]
pub struct SiteOptions {
    /// Absolute origin used for canonical and alternate URLs.
    #[schemars(title = "Origin")]
    pub origin: String,
    /// Locale served without a path prefix.
    #[schemars(skip)]
    pub default_locale: Locale,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            origin: "https://estudi.example".to_owned(),
            default_locale: Locale::DEFAULT,
        }
    }
}
