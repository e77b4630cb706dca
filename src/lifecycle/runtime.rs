//! The per-tab lifecycle: registries plus the navigation signal wiring.

use std::rc::{Rc, Weak};

use super::cleanup::CleanupRegistry;
use super::init::InitManager;
use super::state::StateManager;
use crate::dom::cache::ElementCache;
use crate::dom::{Document, EventKind, Listener};

/// Fired on `document` before a client-side page swap.
pub const NAVIGATION_START_EVENT: &str = "astro:before-swap";
/// Fired on `document` once a client-side page swap completed.
pub const NAVIGATION_COMPLETE_EVENT: &str = "astro:after-swap";

/// Everything scripts share within one browser tab.
pub struct Runtime<D: Document> {
    document: D,
    cleanup: CleanupRegistry,
    state: StateManager,
    scripts: InitManager,
    cache: ElementCache<D>,
}

impl<D: Document> Runtime<D> {
    /// Fresh runtime over `document` with the default element cache keys.
    pub fn new(document: D) -> Self {
        Self {
            cache: ElementCache::with_defaults(document.clone()),
            document,
            cleanup: CleanupRegistry::new(),
            state: StateManager::new(),
            scripts: InitManager::new(),
        }
    }

    /// The document scripts run against.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Keyed teardown registry.
    pub fn cleanup(&self) -> &CleanupRegistry {
        &self.cleanup
    }

    /// Shared state store.
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Script initialization manager.
    pub fn scripts(&self) -> &InitManager {
        &self.scripts
    }

    /// Well-known element cache.
    pub fn cache(&self) -> &ElementCache<D> {
        &self.cache
    }

    /// The DOM became interactive.
    pub fn dom_ready(&self) {
        log::debug!("dom ready");
        self.scripts.dom_ready();
    }

    /// A page swap is about to happen.
    ///
    /// Order: non-persistent cleanups, script teardowns, state sweep,
    /// element cache.
    pub fn navigation_start(&self) {
        log::debug!("navigation start");
        self.cleanup.cleanup_non_persistent();
        self.scripts.on_navigation_start();
        self.state.on_navigation();
        self.cache.clear();
    }

    /// The page swap completed.
    pub fn navigation_complete(&self) {
        log::debug!("navigation complete");
        self.scripts.on_navigation_complete();
    }

    /// Release everything, persistent entries included.
    pub fn teardown(&self) {
        self.cleanup.cleanup_all();
        self.scripts.teardown_all();
        self.state.clear();
        self.cache.clear();
    }

    /// Listen for `DOMContentLoaded` and the two navigation signals.
    ///
    /// Calls [`Runtime::dom_ready`] right away when the document is
    /// already interactive. The handlers hold the runtime weakly, so
    /// dropping the last `Rc` stops them from doing anything.
    pub fn attach(self: &Rc<Self>) -> Vec<Listener> {
        let mut listeners = Vec::with_capacity(3);
        if self.document.is_interactive() {
            self.dom_ready();
        } else {
            let weak = Rc::downgrade(self);
            listeners.push(self.document.listen_document(
                EventKind::DomContentLoaded,
                Box::new(move |_| with_runtime(&weak, Self::dom_ready)),
            ));
        }
        let weak = Rc::downgrade(self);
        listeners.push(self.document.listen_document(
            EventKind::custom(NAVIGATION_START_EVENT),
            Box::new(move |_| with_runtime(&weak, Self::navigation_start)),
        ));
        let weak = Rc::downgrade(self);
        listeners.push(self.document.listen_document(
            EventKind::custom(NAVIGATION_COMPLETE_EVENT),
            Box::new(move |_| with_runtime(&weak, Self::navigation_complete)),
        ));
        listeners
    }
}

fn with_runtime<D: Document>(weak: &Weak<Runtime<D>>, f: fn(&Runtime<D>)) {
    if let Some(runtime) = weak.upgrade() {
        f(&runtime);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::dom::memory::MemoryDocument;
    use crate::dom::{DomEvent, Element};
    use crate::lifecycle::keys::{ACTIVE_FILTERS, THEME};
    use crate::lifecycle::{Disposer, RegisterOptions};

    #[test]
    fn navigation_signals_drive_the_lifecycle() {
        let doc = MemoryDocument::new();
        doc.set_interactive(false);
        let runtime = Rc::new(Runtime::new(doc.clone()));
        let _listeners = runtime.attach();

        let inits = Rc::new(Cell::new(0));
        let i = Rc::clone(&inits);
        runtime.scripts().register_script(
            "probe",
            move || {
                i.set(i.get() + 1);
                Ok(None)
            },
            RegisterOptions::default(),
        );
        assert_eq!(inits.get(), 0);

        doc.dispatch_document(&DomEvent::new(EventKind::DomContentLoaded));
        assert_eq!(inits.get(), 1);

        runtime.state().set(&THEME, "dark".to_owned());
        runtime.state().set(&ACTIVE_FILTERS, vec!["web".to_owned()]);
        let torn = Rc::new(Cell::new(false));
        let t = Rc::clone(&torn);
        runtime
            .cleanup()
            .register("page", Disposer::new(move || t.set(true)), false);

        doc.dispatch_document(&DomEvent::new(EventKind::custom(NAVIGATION_START_EVENT)));
        assert!(torn.get());
        assert!(runtime.state().contains(&THEME));
        assert!(!runtime.state().contains(&ACTIVE_FILTERS));

        doc.dispatch_document(&DomEvent::new(EventKind::custom(
            NAVIGATION_COMPLETE_EVENT,
        )));
        assert_eq!(inits.get(), 2);
    }

    #[test]
    fn navigation_start_clears_element_cache() {
        let doc = MemoryDocument::new();
        let header = doc.append_to_body("header");
        header.set_attribute("data-site-header", "");
        let runtime = Runtime::new(doc.clone());
        assert!(runtime.cache().get(crate::dom::cache::HEADER).is_some());
        assert!(!runtime.cache().is_empty());
        runtime.navigation_start();
        assert!(runtime.cache().is_empty());
    }

    #[test]
    fn teardown_releases_persistent_entries() {
        let runtime = Runtime::new(MemoryDocument::new());
        let torn = Rc::new(Cell::new(0));
        let t = Rc::clone(&torn);
        runtime
            .cleanup()
            .register("cursor", Disposer::new(move || t.set(t.get() + 1)), true);
        runtime.navigation_start();
        assert_eq!(torn.get(), 0);
        runtime.teardown();
        assert_eq!(torn.get(), 1);
        assert!(runtime.cleanup().is_empty());
    }
}
