use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A supported site language.
///
/// Catalan is the default and lives at unprefixed paths; Spanish and
/// English are served under `/es` and `/en`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Catalan (default).
    #[default]
    Ca,
    /// Spanish.
    Es,
    /// English.
    En,
}

impl Locale {
    /// Every locale, default first.
    pub const ALL: [Self; 3] = [Self::Ca, Self::Es, Self::En];
    /// The unprefixed locale.
    pub const DEFAULT: Self = Self::Ca;

    /// Two-letter code used in paths and document ids.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ca => "ca",
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// Parse a two-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Parse a code, case-insensitively, falling back to
    /// [`Locale::DEFAULT`] for anything unsupported.
    #[must_use]
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_else(|e: UnknownLocale| {
            log::warn!("{e}; using '{}'", Self::DEFAULT);
            Self::DEFAULT
        })
    }

    /// Whether this is the unprefixed locale.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Ca)
    }

    /// Path prefix: empty for the default locale, `/es` or `/en` otherwise.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Ca => "",
            Self::Es => "/es",
            Self::En => "/en",
        }
    }

    /// BCP 47 tag for `hreflang` and `<html lang>`.
    #[must_use]
    pub const fn hreflang(self) -> &'static str {
        match self {
            Self::Ca => "ca-ES",
            Self::Es => "es-ES",
            Self::En => "en",
        }
    }

    /// Index into per-locale tables ordered like [`Locale::ALL`].
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Ca => 0,
            Self::Es => 1,
            Self::En => 2,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unsupported locale code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale '{}'", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.to_ascii_lowercase()).ok_or_else(|| UnknownLocale(s.to_owned()))
    }
}
