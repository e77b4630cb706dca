use serde::de::DeserializeOwned;
use serde::Deserialize as _;
use serde_json::Value;

use super::model::{FooterDoc, HeaderDoc, Page, PageKind, Project};
use super::Query;
use crate::error::SiteError;
use crate::i18n::Locale;

/// Anything that can answer a [`Query`] with raw JSON.
pub trait ContentSource {
    /// Run `query`. `Ok(None)` means no matching document.
    fn fetch(&self, query: &Query) -> Result<Option<Value>, SiteError>;
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn fetch(&self, query: &Query) -> Result<Option<Value>, SiteError> {
        (**self).fetch(query)
    }
}

/// A fetched document: typed when it matched the model, raw otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The document matched `T`.
    Validated(T),
    /// The document did not match `T`; the JSON is kept so the page can
    /// still render what it understands.
    Raw(Value),
}

impl<T> Fetched<T> {
    /// The typed document, if validation succeeded.
    #[must_use]
    pub fn validated(&self) -> Option<&T> {
        match self {
            Self::Validated(doc) => Some(doc),
            Self::Raw(_) => None,
        }
    }

    /// Consume into the typed document, if validation succeeded.
    #[must_use]
    pub fn into_validated(self) -> Option<T> {
        match self {
            Self::Validated(doc) => Some(doc),
            Self::Raw(_) => None,
        }
    }

    /// Whether validation succeeded.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        matches!(self, Self::Validated(_))
    }
}

impl<T: serde::Serialize> Fetched<T> {
    /// JSON form of either variant.
    pub fn to_json(&self) -> Result<Value, SiteError> {
        match self {
            Self::Validated(doc) => Ok(serde_json::to_value(doc)?),
            Self::Raw(value) => Ok(value.clone()),
        }
    }
}

/// Run `query`, validate the result as `T`, fall back to the raw JSON when
/// validation fails and to `None` when the query fails or finds nothing.
pub fn fetch_validated<T: DeserializeOwned>(
    source: &dyn ContentSource,
    query: &Query,
) -> Option<Fetched<T>> {
    let value = match source.fetch(query) {
        Ok(Some(Value::Null) | None) => return None,
        Ok(Some(value)) => value,
        Err(e) => {
            log::error!("content query failed: {e} ({query:?})");
            return None;
        }
    };
    match T::deserialize(&value) {
        Ok(doc) => Some(Fetched::Validated(doc)),
        Err(e) => {
            log::warn!("content did not validate, using raw document: {e} ({query:?})");
            Some(Fetched::Raw(value))
        }
    }
}

/// The first query in `chain` that yields a document.
fn first_of<T: DeserializeOwned>(
    source: &dyn ContentSource,
    chain: impl IntoIterator<Item = Query>,
) -> Option<Fetched<T>> {
    chain
        .into_iter()
        .find_map(|query| fetch_validated(source, &query))
}

/// Localized ids first, then the default locale's.
fn id_chain(doc_type: &str, locale: Locale) -> Vec<Query> {
    let mut chain = vec![Query::by_id(format!("{doc_type}-{}", locale.code()))];
    if !locale.is_default() {
        chain.push(Query::by_id(format!(
            "{doc_type}-{}",
            Locale::DEFAULT.code()
        )));
    }
    chain
}

/// A singleton page: localized document, then the default locale's.
pub fn fetch_page(
    source: &dyn ContentSource,
    kind: PageKind,
    locale: Locale,
) -> Option<Fetched<Page>> {
    first_of(source, id_chain(kind.doc_type(), locale))
}

/// The header: localized, default locale, then any header document.
pub fn fetch_header(source: &dyn ContentSource, locale: Locale) -> Option<Fetched<HeaderDoc>> {
    let mut chain = id_chain("header", locale);
    chain.push(Query::first_of_type("header"));
    first_of(source, chain)
}

/// The footer: localized, default locale, then any footer document.
pub fn fetch_footer(source: &dyn ContentSource, locale: Locale) -> Option<Fetched<FooterDoc>> {
    let mut chain = id_chain("footer", locale);
    chain.push(Query::first_of_type("footer"));
    first_of(source, chain)
}

/// Every project in `locale`, falling back to the default locale's list when
/// the localized one is empty. Documents that fail validation are skipped.
pub fn fetch_projects(source: &dyn ContentSource, locale: Locale) -> Vec<Project> {
    let mut locales = vec![locale];
    if !locale.is_default() {
        locales.push(Locale::DEFAULT);
    }
    for language in locales {
        let query = Query::AllOfType {
            doc_type: "project".to_owned(),
            language: Some(language),
        };
        let items = match source.fetch(&query) {
            Ok(Some(Value::Array(items))) => items,
            Ok(_) => Vec::new(),
            Err(e) => {
                log::error!("project list query failed: {e}");
                Vec::new()
            }
        };
        let projects: Vec<Project> = items
            .iter()
            .filter_map(|item| match Project::deserialize(item) {
                Ok(project) => Some(project),
                Err(e) => {
                    log::warn!("skipping invalid project: {e}");
                    None
                }
            })
            .collect();
        if !projects.is_empty() {
            return projects;
        }
    }
    Vec::new()
}

/// One project by slug: as given, with the locale suffix (`-es`, `-en`),
/// then the default locale's document.
pub fn fetch_project(
    source: &dyn ContentSource,
    locale: Locale,
    slug: &str,
) -> Option<Fetched<Project>> {
    let by_slug = |slug: String, language: Locale| Query::BySlug {
        doc_type: "project".to_owned(),
        slug,
        language: Some(language),
    };
    let mut chain = vec![by_slug(slug.to_owned(), locale)];
    if !locale.is_default() {
        chain.push(by_slug(format!("{slug}-{}", locale.code()), locale));
        chain.push(by_slug(slug.to_owned(), Locale::DEFAULT));
    }
    first_of(source, chain)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::content::MemoryContentSource;

    fn header(id: &str) -> Value {
        json!({
            "_id": id,
            "_type": "header",
            "navigation": [{ "label": "Projectes", "href": "/projectes" }]
        })
    }

    #[test]
    fn header_falls_back_to_default_then_any() {
        let source = MemoryContentSource::new(vec![header("header-ca")]);
        let doc = fetch_header(&source, Locale::En).unwrap();
        assert_eq!(doc.validated().unwrap().id, "header-ca");

        let source = MemoryContentSource::new(vec![header("header-legacy")]);
        let doc = fetch_header(&source, Locale::Es).unwrap();
        assert_eq!(doc.validated().unwrap().id, "header-legacy");
        assert_eq!(
            source.queries(),
            vec![
                Query::by_id("header-es"),
                Query::by_id("header-ca"),
                Query::first_of_type("header"),
            ]
        );
    }

    #[test]
    fn unknown_locale_code_uses_default_header_chain() {
        let locale = Locale::from_code_or_default("xx");
        let source = MemoryContentSource::new(vec![header("header-en"), header("header-ca")]);
        let doc = fetch_header(&source, locale).unwrap();
        assert_eq!(doc.validated().unwrap().id, "header-ca");

        let source = MemoryContentSource::new(vec![header("header-legacy")]);
        let doc = fetch_header(&source, locale).unwrap();
        assert_eq!(doc.validated().unwrap().id, "header-legacy");
        assert_eq!(
            source.queries(),
            vec![Query::by_id("header-ca"), Query::first_of_type("header")]
        );

        let source = MemoryContentSource::new(Vec::new());
        assert!(fetch_header(&source, locale).is_none());
    }

    #[test]
    fn header_chain_ends_in_none_without_error() {
        let source = MemoryContentSource::new(Vec::new());
        assert!(fetch_header(&source, Locale::En).is_none());
        assert_eq!(source.queries().len(), 3);
        let failing = MemoryContentSource::failing("network down");
        assert!(fetch_footer(&failing, Locale::Ca).is_none());
    }

    #[test]
    fn invalid_document_falls_back_to_raw() {
        let source = MemoryContentSource::new(vec![json!({ "_id": "homePage-ca", "title": 42 })]);
        let page = fetch_page(&source, PageKind::Home, Locale::Ca).unwrap();
        assert!(!page.is_validated());
        assert_eq!(page.to_json().unwrap()["title"], json!(42));
    }

    #[test]
    fn page_prefers_localized_document() {
        let source = MemoryContentSource::new(vec![
            json!({ "_id": "aboutPage-ca", "title": "Estudi" }),
            json!({ "_id": "aboutPage-en", "title": "Studio" }),
        ]);
        let en = fetch_page(&source, PageKind::About, Locale::En).unwrap();
        assert_eq!(en.into_validated().unwrap().title, "Studio");
        let es = fetch_page(&source, PageKind::About, Locale::Es).unwrap();
        assert_eq!(es.into_validated().unwrap().title, "Estudi");
    }

    fn project(id: &str, slug: &str, language: &str) -> Value {
        json!({
            "_id": id,
            "_type": "project",
            "title": id,
            "slug": { "current": slug },
            "language": language
        })
    }

    #[test]
    fn projects_fall_back_to_default_locale_list() {
        let source = MemoryContentSource::new(vec![
            project("a", "a", "ca"),
            project("b", "b", "ca"),
            json!({ "_id": "broken", "_type": "project", "language": "ca" }),
        ]);
        let list = fetch_projects(&source, Locale::En);
        let ids: Vec<&str> = list.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn project_slug_tries_locale_suffix() {
        let source = MemoryContentSource::new(vec![
            project("casa-ca", "casa", "ca"),
            project("casa-es", "casa-es", "es"),
        ]);
        let es = fetch_project(&source, Locale::Es, "casa").unwrap();
        assert_eq!(es.validated().unwrap().id, "casa-es");
        let en = fetch_project(&source, Locale::En, "casa").unwrap();
        assert_eq!(en.validated().unwrap().id, "casa-ca");
        assert!(fetch_project(&source, Locale::Ca, "missing").is_none());
    }
}
