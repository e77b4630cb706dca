use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Headless CMS connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "CMS", inline)]
#[serde(default)]
pub struct CmsOptions {
    /// Project identifier (first label of the API host).
    #[schemars(title = "Project ID")]
    pub project_id: String,
    /// Dataset name.
    #[schemars(title = "Dataset")]
    pub dataset: String,
    /// Dated API version, `YYYY-MM-DD`.
    #[schemars(title = "API Version")]
    pub api_version: String,
    /// Query the edge cache instead of the live API.
    #[schemars(title = "Use CDN")]
    pub use_cdn: bool,
    /// Read token for drafts; never written back to presets.
    #[schemars(skip)]
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for CmsOptions {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_owned(),
            api_version: "2024-01-01".to_owned(),
            use_cdn: true,
            token: None,
        }
    }
}
