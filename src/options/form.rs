use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Contact form submission target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Contact Form", inline)]
#[serde(default)]
pub struct FormOptions {
    /// Path or URL the form is posted to.
    #[schemars(title = "Endpoint")]
    pub endpoint: String,
    /// Value of the `form-name` field the static host routes on.
    #[schemars(title = "Form Name")]
    pub form_name: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            endpoint: "/".to_owned(),
            form_name: "contact".to_owned(),
        }
    }
}
