//! Crate-level error types.

use std::fmt;

/// Errors produced by the vitrina crate.
#[derive(Debug)]
pub enum SiteError {
    /// An expected DOM element or collection was not found.
    MissingElement(String),
    /// A script's setup or teardown reported a failure.
    Script(String),
    /// A state subscriber reported a failure.
    Subscriber(String),
    /// The CMS request could not be completed.
    ContentFetch(String),
    /// CMS data did not match the expected document shape.
    ContentDecode(serde_json::Error),
    /// The contact form could not be posted.
    FormTransport(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A browser API call failed.
    Web(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(what) => {
                write!(f, "missing element: {what}")
            }
            Self::Script(msg) => write!(f, "script error: {msg}"),
            Self::Subscriber(msg) => write!(f, "subscriber error: {msg}"),
            Self::ContentFetch(msg) => {
                write!(f, "content fetch error: {msg}")
            }
            Self::ContentDecode(e) => write!(f, "content decode error: {e}"),
            Self::FormTransport(msg) => {
                write!(f, "form submission error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Web(msg) => write!(f, "browser error: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ContentDecode(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(e: serde_json::Error) -> Self {
        Self::ContentDecode(e)
    }
}

impl From<std::io::Error> for SiteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result of a callback whose failure is logged by the caller rather than
/// propagated.
pub type Outcome = Result<(), SiteError>;
