use std::fmt;

use crate::i18n::Locale;

/// A content lookup understood by every [`ContentSource`](super::ContentSource).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// The document with this `_id`.
    ById(String),
    /// Any one document of this `_type`.
    FirstOfType(String),
    /// Every document of a type, optionally restricted to one language,
    /// ordered by `orderRank`.
    AllOfType {
        /// Document `_type`.
        doc_type: String,
        /// Language filter.
        language: Option<Locale>,
    },
    /// The document of a type whose slug is `slug`.
    BySlug {
        /// Document `_type`.
        doc_type: String,
        /// Slug (`slug.current`).
        slug: String,
        /// Language filter.
        language: Option<Locale>,
    },
}

impl Query {
    /// Lookup by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::ById(id.into())
    }

    /// First document of a type.
    pub fn first_of_type(doc_type: impl Into<String>) -> Self {
        Self::FirstOfType(doc_type.into())
    }

    /// Render as a GROQ query string.
    #[must_use]
    pub fn to_groq(&self) -> String {
        match self {
            Self::ById(id) => format!("*[_id == {}][0]{PROJECTION}", quote(id)),
            Self::FirstOfType(t) => format!("*[_type == {}][0]{PROJECTION}", quote(t)),
            Self::AllOfType { doc_type, language } => format!(
                "*[_type == {}{}] | order(orderRank asc){PROJECTION}",
                quote(doc_type),
                language_filter(*language)
            ),
            Self::BySlug {
                doc_type,
                slug,
                language,
            } => format!(
                "*[_type == {} && slug.current == {}{}][0]{PROJECTION}",
                quote(doc_type),
                quote(slug),
                language_filter(*language)
            ),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_groq())
    }
}

/// Dereference image assets so URL, LQIP and dimensions arrive inline.
const PROJECTION: &str = concat!(
    "{..., \"mainImage\": mainImage{..., asset->}, ",
    "\"gallery\": gallery[]{..., asset->}}",
);

fn language_filter(language: Option<Locale>) -> String {
    language.map_or_else(String::new, |l| format!(" && language == {}", quote(l.code())))
}

/// GROQ string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
