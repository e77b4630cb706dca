//! Shared values between scripts, addressed by typed keys.
//!
//! A [`StateKey<T>`] names a slot and fixes the type stored in it, so two
//! scripts agreeing on a key also agree on its type. Subscribers are told
//! synchronously about every change; `None` means the value is gone
//! (deleted, cleared or purged by a navigation sweep).

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::error::Outcome;

/// Key ids that survive the navigation sweep.
pub const PERSISTENT_KEYS: [&str; 3] = ["theme", "locale", "user-preferences"];

/// Typed, optionally namespaced state key.
pub struct StateKey<T> {
    namespace: &'static str,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Key in the global namespace.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            namespace: "",
            name,
            _marker: PhantomData,
        }
    }

    /// Key scoped to one script's namespace (`namespace:name`).
    #[must_use]
    pub const fn namespaced(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace,
            name,
            _marker: PhantomData,
        }
    }

    /// The storage id.
    #[must_use]
    pub fn id(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_owned()
        } else {
            format!("{}:{}", self.namespace, self.name)
        }
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> std::fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateKey({})", self.id())
    }
}

type Value = Rc<dyn Any>;
type SharedSubscriber = Rc<RefCell<dyn FnMut(Option<&dyn Any>) -> Outcome>>;

#[derive(Default)]
struct StateInner {
    values: RefCell<FxHashMap<String, Value>>,
    subscribers: RefCell<FxHashMap<String, Vec<(u64, SharedSubscriber)>>>,
    next_id: Cell<u64>,
}

/// Keyed store of shared values. Clones share the same store.
#[derive(Clone, Default)]
pub struct StateManager {
    inner: Rc<StateInner>,
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("keys", &self.keys())
            .finish()
    }
}

impl StateManager {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and notify subscribers of `key`.
    pub fn set<T: 'static>(&self, key: &StateKey<T>, value: T) {
        let id = key.id();
        let value: Value = Rc::new(value);
        let _ = self
            .inner
            .values
            .borrow_mut()
            .insert(id.clone(), Rc::clone(&value));
        self.notify(&id, Some(&value));
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get<T: Clone + 'static>(&self, key: &StateKey<T>) -> Option<T> {
        let id = key.id();
        let values = self.inner.values.borrow();
        let value = values.get(&id)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            log::warn!("state '{id}' holds a value of another type");
        }
        typed.cloned()
    }

    /// Current value of `key`, or `fallback` when absent.
    #[must_use]
    pub fn get_or_default<T: Clone + 'static>(&self, key: &StateKey<T>, fallback: T) -> T {
        self.get(key).unwrap_or(fallback)
    }

    /// Whether `key` holds a value.
    #[must_use]
    pub fn contains<T>(&self, key: &StateKey<T>) -> bool {
        self.inner.values.borrow().contains_key(&key.id())
    }

    /// Remove `key`, notifying subscribers with `None` if it existed.
    pub fn delete<T>(&self, key: &StateKey<T>) -> bool {
        let id = key.id();
        let removed = self.inner.values.borrow_mut().remove(&id);
        if removed.is_some() {
            self.notify(&id, None);
        }
        removed.is_some()
    }

    /// Listen for changes of `key`. The subscription ends when the
    /// returned guard is dropped.
    pub fn subscribe<T: 'static>(
        &self,
        key: &StateKey<T>,
        mut listener: impl FnMut(Option<&T>) -> Outcome + 'static,
    ) -> Subscription {
        let id = key.id();
        let sub_id = self.inner.next_id.get();
        self.inner.next_id.set(sub_id + 1);
        let wrapped: SharedSubscriber = Rc::new(RefCell::new(
            move |value: Option<&dyn Any>| {
                listener(value.and_then(|v| v.downcast_ref::<T>()))
            },
        ));
        self.inner
            .subscribers
            .borrow_mut()
            .entry(id.clone())
            .or_default()
            .push((sub_id, wrapped));
        Subscription {
            store: Rc::downgrade(&self.inner),
            key: id,
            id: sub_id,
        }
    }

    /// Remove every value and notify every subscriber with `None`.
    pub fn clear(&self) {
        self.inner.values.borrow_mut().clear();
        let keys: Vec<String> =
            self.inner.subscribers.borrow().keys().cloned().collect();
        for key in keys {
            self.notify(&key, None);
        }
    }

    /// Navigation sweep: remove every key not in [`PERSISTENT_KEYS`].
    pub fn on_navigation(&self) {
        let purged: Vec<String> = {
            let mut values = self.inner.values.borrow_mut();
            let purged: Vec<String> = values
                .keys()
                .filter(|k| !PERSISTENT_KEYS.contains(&k.as_str()))
                .cloned()
                .collect();
            for key in &purged {
                let _ = values.remove(key);
            }
            purged
        };
        for key in purged {
            self.notify(&key, None);
        }
    }

    /// Ids of every stored key.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> =
            self.inner.values.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn notify(&self, id: &str, value: Option<&Value>) {
        let subscribers: Vec<SharedSubscriber> = self
            .inner
            .subscribers
            .borrow()
            .get(id)
            .map(|subs| subs.iter().map(|(_, s)| Rc::clone(s)).collect())
            .unwrap_or_default();
        let payload: Option<&dyn Any> = value.map(|v| &**v);
        for subscriber in subscribers {
            let Ok(mut subscriber) = subscriber.try_borrow_mut() else {
                log::debug!("state '{id}': skipping re-entrant subscriber");
                continue;
            };
            if let Err(e) = (*subscriber)(payload) {
                log::error!("state '{id}' subscriber failed: {e}");
            }
        }
    }
}

/// Guard for a state subscription; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    store: Weak<StateInner>,
    key: String,
    id: u64,
}

impl Subscription {
    /// Stop receiving notifications. Safe to call repeatedly.
    pub fn unsubscribe(&mut self) {
        if let Some(store) = self.store.upgrade() {
            let mut subscribers = store.subscribers.borrow_mut();
            if let Some(subs) = subscribers.get_mut(&self.key) {
                subs.retain(|(id, _)| *id != self.id);
                if subs.is_empty() {
                    let _ = subscribers.remove(&self.key);
                }
            }
        }
        self.store = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;
    use crate::lifecycle::keys::{FILTER_DRAG_EVENT, THEME};

    #[test]
    fn set_get_delete() {
        let state = StateManager::new();
        state.set(&THEME, "dark".to_owned());
        assert_eq!(state.get(&THEME).as_deref(), Some("dark"));
        assert!(state.delete(&THEME));
        assert!(!state.delete(&THEME));
        assert_eq!(state.get_or_default(&THEME, "light".into()), "light");
    }

    #[test]
    fn navigation_purges_all_but_persistent_keys() {
        let state = StateManager::new();
        let locale = StateKey::<String>::new("locale");
        let prefs = StateKey::<u32>::new("user-preferences");
        let counter = StateKey::<u32>::namespaced("slider", "current");

        state.set(&THEME, "dark".to_owned());
        state.set(&locale, "ca".to_owned());
        state.set(&prefs, 7);
        state.set(&counter, 3);
        state.set(&FILTER_DRAG_EVENT, true);

        state.on_navigation();

        assert_eq!(state.get(&THEME).as_deref(), Some("dark"));
        assert_eq!(state.get(&locale).as_deref(), Some("ca"));
        assert_eq!(state.get(&prefs), Some(7));
        assert!(!state.contains(&counter));
        assert!(!state.contains(&FILTER_DRAG_EVENT));
    }

    #[test]
    fn subscribers_see_values_and_removals() {
        let state = StateManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = state.subscribe(&FILTER_DRAG_EVENT, move |v| {
            s.borrow_mut().push(v.copied());
            Ok(())
        });

        state.set(&FILTER_DRAG_EVENT, true);
        state.set(&FILTER_DRAG_EVENT, false);
        let _ = state.delete(&FILTER_DRAG_EVENT);
        state.set(&FILTER_DRAG_EVENT, true);
        state.clear();

        assert_eq!(
            *seen.borrow(),
            vec![Some(true), Some(false), None, Some(true), None]
        );
    }

    #[test]
    fn failing_subscriber_does_not_block_others() {
        let state = StateManager::new();
        let hits = Rc::new(Cell::new(0));
        let _bad = state.subscribe(&THEME, |_| Err(SiteError::Subscriber("nope".into())));
        let h = Rc::clone(&hits);
        let _good = state.subscribe(&THEME, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        state.set(&THEME, "light".to_owned());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let state = StateManager::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut sub = state.subscribe(&THEME, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        state.set(&THEME, "a".to_owned());
        sub.unsubscribe();
        sub.unsubscribe();
        state.set(&THEME, "b".to_owned());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscriber_may_write_other_keys() {
        let state = StateManager::new();
        let mirror = StateKey::<String>::namespaced("test", "mirror");
        let inner = state.clone();
        let _sub = state.subscribe(&THEME, move |v| {
            if let Some(v) = v {
                inner.set(&mirror, v.clone());
            }
            Ok(())
        });
        state.set(&THEME, "dark".to_owned());
        assert_eq!(state.get(&mirror).as_deref(), Some("dark"));
    }
}
