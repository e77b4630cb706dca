//! Memoized lookups for well-known page elements.
//!
//! Keys are registered with a selector up front; the first `get` queries
//! the document and later calls return the memoized node. The whole cache
//! is cleared on every navigation start because the page swap replaces the
//! DOM and any memoized node would be detached.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::Document;

/// Site header.
pub const HEADER: &str = "header";
/// Mobile navigation drawer.
pub const MOBILE_MENU: &str = "mobile-menu";
/// Horizontal scroll section on the home page.
pub const HORIZONTAL_SCROLL: &str = "horizontal-scroll";

/// Selector-keyed element cache over a [`Document`].
pub struct ElementCache<D: Document> {
    document: D,
    selectors: RefCell<FxHashMap<String, String>>,
    nodes: RefCell<FxHashMap<String, Option<D::Element>>>,
}

impl<D: Document> ElementCache<D> {
    /// Empty cache.
    pub fn new(document: D) -> Self {
        Self {
            document,
            selectors: RefCell::new(FxHashMap::default()),
            nodes: RefCell::new(FxHashMap::default()),
        }
    }

    /// Cache pre-registered with the site's well-known elements.
    pub fn with_defaults(document: D) -> Self {
        let cache = Self::new(document);
        cache.register(HEADER, "[data-site-header]");
        cache.register(MOBILE_MENU, "[data-mobile-menu]");
        cache.register(HORIZONTAL_SCROLL, "[data-horizontal-scroll]");
        cache
    }

    /// Associate `key` with `selector`. No query is performed; a previous
    /// memoized node for `key` is dropped.
    pub fn register(&self, key: &str, selector: &str) {
        let _ = self
            .selectors
            .borrow_mut()
            .insert(key.to_owned(), selector.to_owned());
        let _ = self.nodes.borrow_mut().remove(key);
    }

    /// The element for `key`, queried on first access.
    ///
    /// A miss is memoized too, so repeated lookups of an element absent
    /// from the current page do not requery.
    pub fn get(&self, key: &str) -> Option<D::Element> {
        if let Some(hit) = self.nodes.borrow().get(key) {
            return hit.clone();
        }
        let selector = self.selectors.borrow().get(key).cloned();
        let Some(selector) = selector else {
            log::warn!("element cache: unregistered key '{key}'");
            return None;
        };
        let found = self.document.query_selector(&selector);
        let _ = self
            .nodes
            .borrow_mut()
            .insert(key.to_owned(), found.clone());
        found
    }

    /// Drop the memoized node for `key`.
    pub fn invalidate(&self, key: &str) {
        let _ = self.nodes.borrow_mut().remove(key);
    }

    /// Drop every memoized node; registrations are kept.
    pub fn clear(&self) {
        self.nodes.borrow_mut().clear();
    }

    /// Number of memoized entries (hits and misses).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDocument;
    use crate::dom::Element;

    #[test]
    fn memoizes_until_cleared() {
        let doc = MemoryDocument::new();
        let header = doc.append_to_body("header");
        header.set_attribute("data-site-header", "");
        let cache = ElementCache::with_defaults(doc.clone());

        let first = cache.get(HEADER).unwrap();
        assert!(first.same_node(&header));

        // Page swap: the old header is gone, a new one replaces it.
        doc.swap_body();
        let replacement = doc.append_to_body("header");
        replacement.set_attribute("data-site-header", "");
        assert!(cache.get(HEADER).unwrap().same_node(&header));

        cache.clear();
        assert!(cache.get(HEADER).unwrap().same_node(&replacement));
    }

    #[test]
    fn invalidate_and_unknown_keys() {
        let doc = MemoryDocument::new();
        let cache = ElementCache::with_defaults(doc.clone());
        assert!(cache.get(MOBILE_MENU).is_none());

        let menu = doc.append_to_body("nav");
        menu.set_attribute("data-mobile-menu", "");
        assert!(cache.get(MOBILE_MENU).is_none());
        cache.invalidate(MOBILE_MENU);
        assert!(cache.get(MOBILE_MENU).is_some());

        assert!(cache.get("footer").is_none());
        assert_eq!(cache.len(), 1);
    }
}
