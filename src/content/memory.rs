use std::cell::RefCell;

use serde_json::Value;

use super::{ContentSource, Query};
use crate::error::SiteError;

/// In-process content store that evaluates [`Query`] values directly over a
/// list of JSON documents. Records every query it receives.
#[derive(Debug, Default)]
pub struct MemoryContentSource {
    documents: Vec<Value>,
    failure: Option<String>,
    log: RefCell<Vec<Query>>,
}

impl MemoryContentSource {
    /// Store over `documents`.
    #[must_use]
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// Store whose every query fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<Query> {
        self.log.borrow().clone()
    }

    fn field<'a>(doc: &'a Value, name: &str) -> Option<&'a str> {
        doc.get(name).and_then(Value::as_str)
    }

    fn slug_of(doc: &Value) -> Option<&str> {
        match doc.get("slug")? {
            Value::String(s) => Some(s.as_str()),
            other => other.get("current").and_then(Value::as_str),
        }
    }

    fn matches(query: &Query, doc: &Value) -> bool {
        match query {
            Query::ById(id) => Self::field(doc, "_id") == Some(id.as_str()),
            Query::FirstOfType(t) => Self::field(doc, "_type") == Some(t.as_str()),
            Query::AllOfType { doc_type, language } => {
                Self::field(doc, "_type") == Some(doc_type.as_str())
                    && language.is_none_or(|l| Self::field(doc, "language") == Some(l.code()))
            }
            Query::BySlug {
                doc_type,
                slug,
                language,
            } => {
                Self::field(doc, "_type") == Some(doc_type.as_str())
                    && Self::slug_of(doc) == Some(slug.as_str())
                    && language.is_none_or(|l| Self::field(doc, "language") == Some(l.code()))
            }
        }
    }
}

impl ContentSource for MemoryContentSource {
    fn fetch(&self, query: &Query) -> Result<Option<Value>, SiteError> {
        self.log.borrow_mut().push(query.clone());
        if let Some(message) = &self.failure {
            return Err(SiteError::ContentFetch(message.clone()));
        }
        let mut hits = self.documents.iter().filter(|doc| Self::matches(query, doc));
        Ok(match query {
            Query::AllOfType { .. } => Some(Value::Array(hits.cloned().collect())),
            _ => hits.next().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn evaluates_queries() {
        let source = MemoryContentSource::new(vec![
            json!({ "_id": "p1", "_type": "project", "slug": "one", "language": "ca" }),
            json!({
                "_id": "p2",
                "_type": "project",
                "slug": { "current": "two" },
                "language": "en"
            }),
            json!({ "_id": "f", "_type": "footer" }),
        ]);
        let one = |q: Query| source.fetch(&q).unwrap();
        assert_eq!(one(Query::by_id("f")).unwrap()["_type"], "footer");
        assert_eq!(one(Query::first_of_type("project")).unwrap()["_id"], "p1");
        assert!(one(Query::by_id("nope")).is_none());
        let slug = Query::BySlug {
            doc_type: "project".to_owned(),
            slug: "two".to_owned(),
            language: Some(Locale::En),
        };
        assert_eq!(one(slug).unwrap()["_id"], "p2");
        let all = Query::AllOfType {
            doc_type: "project".to_owned(),
            language: Some(Locale::Ca),
        };
        assert_eq!(one(all).unwrap().as_array().map(Vec::len), Some(1));
        assert_eq!(source.queries().len(), 5);
    }

    #[test]
    fn failing_source_reports_fetch_errors() {
        let source = MemoryContentSource::failing("offline");
        let err = source.fetch(&Query::by_id("x")).unwrap_err();
        assert!(matches!(err, SiteError::ContentFetch(m) if m == "offline"));
    }
}
