//! Site configuration with TOML file support.
//!
//! Everything tunable (site origin, CMS connection, slider timing, text
//! reveal, pointer effects, form endpoint) lives in one [`Options`] value.
//! Every section is `#[serde(default)]`, so a file overriding only
//! `[cms]` is complete.

mod cms;
mod effects;
mod form;
mod reveal;
mod site;
mod slider;

use std::path::Path;

pub use cms::CmsOptions;
pub use effects::EffectsOptions;
pub use form::FormOptions;
pub use reveal::{RevealMode, RevealOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use site::SiteOptions;
pub use slider::SliderOptions;

use crate::error::SiteError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Public origin and default locale.
    pub site: SiteOptions,
    /// Headless CMS connection.
    pub cms: CmsOptions,
    /// Slider timing.
    pub slider: SliderOptions,
    /// Text reveal parameters.
    pub reveal: RevealOptions,
    /// Pointer and scroll effects.
    pub effects: EffectsOptions,
    /// Contact form endpoint.
    pub form: FormOptions,
}

impl Options {
    /// Generate JSON Schema describing the editable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, SiteError> {
        toml::from_str(content).map_err(|e| SiteError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(SiteError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SiteError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SiteError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SiteError::Io)?;
        }
        std::fs::write(path, content).map_err(SiteError::Io)
    }

    /// Options with CMS secrets taken from the environment
    /// (`SANITY_PROJECT_ID`, `SANITY_DATASET`, `SANITY_TOKEN`).
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(project) = std::env::var("SANITY_PROJECT_ID") {
            self.cms.project_id = project;
        }
        if let Ok(dataset) = std::env::var("SANITY_DATASET") {
            self.cms.dataset = dataset;
        }
        if let Ok(token) = std::env::var("SANITY_TOKEN") {
            self.cms.token = Some(token).filter(|t| !t.is_empty());
        }
        self
    }
}
