//! HTTP client for the hosted CMS query API.

use serde::Deserialize;
use serde_json::Value;

use super::{ContentSource, Query};
use crate::error::SiteError;
use crate::options::CmsOptions;

/// Response envelope of the query endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Value,
}

/// Blocking query client.
#[derive(Debug, Clone)]
pub struct SanityClient {
    endpoint: String,
    token: Option<String>,
}

impl SanityClient {
    /// Client for the project described by `options`.
    pub fn new(options: &CmsOptions) -> Result<Self, SiteError> {
        if options.project_id.trim().is_empty() {
            return Err(SiteError::ContentFetch("no CMS project id configured".to_owned()));
        }
        Ok(Self {
            endpoint: endpoint(options),
            token: options.token.clone(),
        })
    }

    /// Query endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// `https://{project}.api[cdn].sanity.io/v{version}/data/query/{dataset}`.
#[must_use]
pub fn endpoint(options: &CmsOptions) -> String {
    let host = if options.use_cdn { "apicdn" } else { "api" };
    format!(
        "https://{}.{host}.sanity.io/v{}/data/query/{}",
        options.project_id, options.api_version, options.dataset
    )
}

impl ContentSource for SanityClient {
    fn fetch(&self, query: &Query) -> Result<Option<Value>, SiteError> {
        let groq = query.to_groq();
        log::debug!("GROQ {groq}");
        let mut request = ureq::get(&self.endpoint).query("query", &groq);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let body = request
            .call()
            .map_err(|e| SiteError::ContentFetch(e.to_string()))?
            .into_body()
            .read_to_string()
            .map_err(|e| SiteError::ContentFetch(e.to_string()))?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        Ok(match envelope.result {
            Value::Null => None,
            value => Some(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_follows_cdn_flag() {
        let mut options = CmsOptions {
            project_id: "abc123".to_owned(),
            ..CmsOptions::default()
        };
        assert_eq!(
            endpoint(&options),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );
        options.use_cdn = false;
        assert_eq!(
            SanityClient::new(&options).unwrap().endpoint(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn missing_project_id_is_rejected() {
        assert!(SanityClient::new(&CmsOptions::default()).is_err());
    }

    #[test]
    fn envelope_null_result() {
        let envelope: Envelope = serde_json::from_str(r#"{"ms": 3, "result": null}"#).unwrap();
        assert!(envelope.result.is_null());
    }
}
