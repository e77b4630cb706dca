//! Keyed store of teardown callbacks.

use std::cell::RefCell;

use crate::error::{Outcome, SiteError};

/// A teardown that releases everything one script acquired.
///
/// `FnOnce` makes double teardown impossible by construction: once a
/// disposer has run it is gone.
pub struct Disposer(Box<dyn FnOnce() -> Outcome>);

impl Disposer {
    /// Infallible teardown.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self(Box::new(move || {
            teardown();
            Ok(())
        }))
    }

    /// Teardown that may report a failure.
    pub fn fallible(teardown: impl FnOnce() -> Outcome + 'static) -> Self {
        Self(Box::new(teardown))
    }

    /// Teardown that drops `resources` (listener guards, timeouts, widget
    /// handles).
    pub fn holding<T: 'static>(resources: T) -> Self {
        Self::new(move || drop(resources))
    }

    /// Run the teardown.
    pub fn dispose(self) -> Outcome {
        (self.0)()
    }

    /// Run the teardown, logging instead of returning a failure.
    pub(crate) fn dispose_logged(self, label: &str) {
        if let Err(e) = self.dispose() {
            log::error!("teardown of '{label}' failed: {e}");
        }
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Disposer")
    }
}

impl From<SiteError> for Disposer {
    /// A disposer that reports the given error when run.
    fn from(error: SiteError) -> Self {
        Self::fallible(move || Err(error))
    }
}

struct CleanupEntry {
    id: String,
    disposer: Disposer,
    persistent: bool,
}

/// Keyed teardown registry with at most one live entry per id.
///
/// Every method releases its internal borrow before running a teardown,
/// so teardowns may register or clean up other entries.
#[derive(Default)]
pub struct CleanupRegistry {
    entries: RefCell<Vec<CleanupEntry>>,
}

impl CleanupRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `disposer` under `id`, first tearing down any entry already
    /// registered under that id.
    pub fn register(&self, id: &str, disposer: Disposer, persistent: bool) {
        let previous = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|e| e.id == id)
                .map(|i| entries.remove(i))
        };
        if let Some(previous) = previous {
            log::debug!("cleanup '{id}' re-registered, tearing down previous");
            Self::run(previous);
        }
        self.entries.borrow_mut().push(CleanupEntry {
            id: id.to_owned(),
            disposer,
            persistent,
        });
    }

    /// Run and remove the entry for `id`. Returns whether one existed.
    pub fn cleanup(&self, id: &str) -> bool {
        let entry = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|e| e.id == id)
                .map(|i| entries.remove(i))
        };
        match entry {
            Some(entry) => {
                Self::run(entry);
                true
            }
            None => false,
        }
    }

    /// Run and remove every non-persistent entry, in registration order.
    pub fn cleanup_non_persistent(&self) {
        let swept: Vec<CleanupEntry> = {
            let mut entries = self.entries.borrow_mut();
            let (keep, swept): (Vec<_>, Vec<_>) = std::mem::take(&mut *entries)
                .into_iter()
                .partition(|e| e.persistent);
            *entries = keep;
            swept
        };
        log::debug!("navigation sweep: {} cleanups", swept.len());
        for entry in swept {
            Self::run(entry);
        }
    }

    /// Run and remove every entry.
    pub fn cleanup_all(&self) {
        let all = std::mem::take(&mut *self.entries.borrow_mut());
        for entry in all {
            Self::run(entry);
        }
    }

    /// Whether an entry is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn run(entry: CleanupEntry) {
        entry.disposer.dispose_logged(&entry.id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Disposer) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move || {
            let c = Rc::clone(&c);
            Disposer::new(move || c.set(c.get() + 1))
        })
    }

    #[test]
    fn reregistering_tears_down_previous_exactly_once() {
        let registry = CleanupRegistry::new();
        let (first_count, first) = counter();
        let (second_count, second) = counter();

        registry.register("slider", first(), false);
        registry.register("slider", second(), false);
        assert_eq!(first_count.get(), 1);
        assert_eq!(second_count.get(), 0);
        assert_eq!(registry.len(), 1);

        registry.cleanup_all();
        assert_eq!(first_count.get(), 1);
        assert_eq!(second_count.get(), 1);
    }

    #[test]
    fn non_persistent_sweep_keeps_persistent_entries() {
        let registry = CleanupRegistry::new();
        let (page_count, page) = counter();
        let (cursor_count, cursor) = counter();

        registry.register("reveal", page(), false);
        registry.register("cursor", cursor(), true);
        registry.cleanup_non_persistent();

        assert_eq!(page_count.get(), 1);
        assert_eq!(cursor_count.get(), 0);
        assert!(registry.contains("cursor"));
        assert!(!registry.contains("reveal"));
    }

    #[test]
    fn failing_teardown_does_not_block_others() {
        let registry = CleanupRegistry::new();
        let (count, ok) = counter();

        registry.register(
            "broken",
            Disposer::fallible(|| Err(SiteError::Script("boom".into()))),
            false,
        );
        registry.register("fine", ok(), false);
        registry.cleanup_non_persistent();
        assert_eq!(count.get(), 1);
        assert!(registry.is_empty());

        // Re-registering over a failing entry still stores the new one.
        registry.register("broken", SiteError::Script("again".into()).into(), false);
        registry.register("broken", ok(), false);
        assert!(registry.contains("broken"));
    }

    #[test]
    fn cleanup_twice_is_a_noop() {
        let registry = CleanupRegistry::new();
        let (count, make) = counter();
        registry.register("filters", make(), false);
        assert!(registry.cleanup("filters"));
        assert!(!registry.cleanup("filters"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_may_reenter_registry() {
        let registry = Rc::new(CleanupRegistry::new());
        let (count, make) = counter();
        let inner = Rc::clone(&registry);
        let replacement = make();
        registry.register(
            "outer",
            Disposer::new(move || inner.register("inner", replacement, true)),
            false,
        );
        registry.cleanup_non_persistent();
        assert!(registry.contains("inner"));
        registry.cleanup_all();
        assert_eq!(count.get(), 1);
    }
}
