use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{parse_tags, FilterBehavior, FilterSet, ALL};
use crate::dom::{Element, EventKind, Listener};
use crate::i18n::{messages, Locale};
use crate::lifecycle::keys::{ACTIVE_FILTERS, FILTER_DRAG_EVENT};
use crate::lifecycle::StateManager;

/// Class set on items filtered out.
pub const HIDDEN_CLASS: &str = "is-hidden";
/// Class set on pressed pills.
pub const ACTIVE_CLASS: &str = "is-active";

/// Selectors the widget looks up inside its root.
#[derive(Debug, Clone)]
pub struct FilterSelectors {
    /// Pills; the attribute value is the tag they toggle.
    pub pills: String,
    /// Filterable items carrying a `data-tags` list.
    pub items: String,
    /// Optional `aria-live` region for announcements.
    pub live_region: String,
}

impl Default for FilterSelectors {
    fn default() -> Self {
        Self {
            pills: "[data-filter]".to_owned(),
            items: "[data-tags]".to_owned(),
            live_region: "[data-filter-status]".to_owned(),
        }
    }
}

struct Inner<E: Element> {
    pills: Vec<(E, String)>,
    items: Vec<(E, Vec<String>)>,
    live_region: Option<E>,
    filters: RefCell<FilterSet>,
    behavior: Box<dyn FilterBehavior>,
    state: StateManager,
    locale: Locale,
}

impl<E: Element> Inner<E> {
    fn toggle(&self, tag: &str) {
        if self.state.get(&FILTER_DRAG_EVENT).unwrap_or(false) {
            log::debug!("filter: ignoring click that ended a drag");
            return;
        }
        let _ = self.filters.borrow_mut().toggle(tag);
        self.apply();
    }

    fn apply(&self) {
        let filters = self.filters.borrow().clone();
        let mut visible = 0;
        for (item, tags) in &self.items {
            let shown = filters.is_all() || self.behavior.matches(tags, &filters);
            item.toggle_class(HIDDEN_CLASS, !shown);
            if shown {
                item.remove_attribute("aria-hidden");
                visible += 1;
            } else {
                item.set_attribute("aria-hidden", "true");
            }
        }
        for (pill, value) in &self.pills {
            let pressed = filters.contains(value);
            pill.toggle_class(ACTIVE_CLASS, pressed);
            pill.set_attribute("aria-pressed", if pressed { "true" } else { "false" });
        }
        self.state.set(&ACTIVE_FILTERS, filters.to_vec());
        if let Some(region) = &self.live_region {
            region.set_text_content(&messages::filter_announcement(self.locale, visible));
        }
        self.behavior.on_change(&filters, visible);
    }

    fn reset(&self) {
        self.filters.borrow_mut().clear();
        for (item, _) in &self.items {
            item.remove_class(HIDDEN_CLASS);
            item.remove_attribute("aria-hidden");
        }
        for (pill, _) in &self.pills {
            pill.remove_class(ACTIVE_CLASS);
            for attr in ["aria-pressed", "role", "tabindex"] {
                pill.remove_attribute(attr);
            }
        }
        if let Some(region) = &self.live_region {
            region.set_text_content("");
        }
        let _ = self.state.delete(&ACTIVE_FILTERS);
    }
}

/// A running filter bound to one pill row and item grid.
///
/// Dropping the widget destroys it.
pub struct FilterWidget<E: Element> {
    inner: Option<Rc<Inner<E>>>,
    listeners: Vec<Listener>,
    destroyed: Cell<bool>,
}

impl<E: Element> std::fmt::Debug for FilterWidget<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterWidget")
            .field("inert", &self.is_inert())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E: Element> FilterWidget<E> {
    /// Bind the pills and items found under `root`.
    ///
    /// Returns an inert widget when either pills or items are missing.
    pub fn setup(
        root: &E,
        selectors: &FilterSelectors,
        behavior: Box<dyn FilterBehavior>,
        state: StateManager,
        locale: Locale,
    ) -> Self {
        let pills: Vec<(E, String)> = root
            .query_selector_all(&selectors.pills)
            .into_iter()
            .map(|pill| {
                let value = pill
                    .get_attribute("data-filter")
                    .unwrap_or_else(|| ALL.to_owned());
                (pill, value)
            })
            .collect();
        let items: Vec<(E, Vec<String>)> = root
            .query_selector_all(&selectors.items)
            .into_iter()
            .map(|item| {
                let tags = item
                    .get_attribute("data-tags")
                    .map(|raw| parse_tags(&raw))
                    .unwrap_or_default();
                (item, tags)
            })
            .collect();
        if pills.is_empty() || items.is_empty() {
            log::warn!(
                "filter: {} pills, {} items; widget is inert",
                pills.len(),
                items.len()
            );
            return Self::inert();
        }

        let inner = Rc::new(Inner {
            live_region: root.query_selector(&selectors.live_region),
            filters: RefCell::new(behavior.initial()),
            pills,
            items,
            behavior,
            state,
            locale,
        });

        let mut listeners = Vec::with_capacity(inner.pills.len() * 2);
        for (pill, value) in &inner.pills {
            pill.set_attribute("role", "button");
            pill.set_attribute("tabindex", "0");

            let weak = Rc::downgrade(&inner);
            let tag = value.clone();
            listeners.push(pill.listen(
                EventKind::Click,
                Box::new(move |_| with_inner(&weak, |inner| inner.toggle(&tag))),
            ));

            let weak = Rc::downgrade(&inner);
            let tag = value.clone();
            listeners.push(pill.listen(
                EventKind::KeyDown,
                Box::new(move |event| {
                    if matches!(event.key(), Some("Enter" | " ")) {
                        event.prevent_default();
                        with_inner(&weak, |inner| inner.toggle(&tag));
                    }
                }),
            ));
        }
        inner.apply();
        log::debug!(
            "filter: bound {} pills to {} items",
            inner.pills.len(),
            inner.items.len()
        );

        Self {
            inner: Some(inner),
            listeners,
            destroyed: Cell::new(false),
        }
    }

    /// A widget with nothing bound.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            inner: None,
            listeners: Vec::new(),
            destroyed: Cell::new(false),
        }
    }

    /// Whether setup found nothing to bind.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Currently active filters.
    #[must_use]
    pub fn filters(&self) -> FilterSet {
        self.inner
            .as_ref()
            .map(|inner| inner.filters.borrow().clone())
            .unwrap_or_default()
    }

    /// Toggle `tag` as if its pill had been clicked.
    pub fn toggle(&self, tag: &str) {
        if let Some(inner) = &self.inner {
            inner.toggle(tag);
        }
    }

    /// Detach listeners and restore visual and ARIA state. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.listeners.clear();
        if let Some(inner) = self.inner.take() {
            inner.reset();
        }
    }
}

impl<E: Element> Drop for FilterWidget<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn with_inner<E: Element>(weak: &Weak<Inner<E>>, f: impl FnOnce(&Inner<E>)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDocument, MemoryElement};
    use crate::dom::DomEvent;
    use crate::filter::{AllMatch, AnyMatch};

    struct Grid {
        _doc: MemoryDocument,
        root: MemoryElement,
        pills: Vec<MemoryElement>,
        items: Vec<MemoryElement>,
        status: MemoryElement,
    }

    fn grid() -> Grid {
        let doc = MemoryDocument::new();
        let root = doc.append_to_body("section");
        let row = root.append("nav");
        let pills = ["all", "A", "B", "C"]
            .into_iter()
            .map(|value| {
                let pill = row.append("button");
                pill.set_attribute("data-filter", value);
                pill
            })
            .collect();
        let items = ["A", "B", "A,B", "C"]
            .into_iter()
            .map(|tags| {
                let item = root.append("article");
                item.set_attribute("data-tags", tags);
                item
            })
            .collect();
        let status = root.append("p");
        status.set_attribute("data-filter-status", "");
        Grid {
            _doc: doc,
            root,
            pills,
            items,
            status,
        }
    }

    fn setup(grid: &Grid, state: &StateManager) -> FilterWidget<MemoryElement> {
        FilterWidget::setup(
            &grid.root,
            &FilterSelectors::default(),
            Box::new(AnyMatch),
            state.clone(),
            Locale::En,
        )
    }

    fn hidden(grid: &Grid) -> Vec<bool> {
        grid.items.iter().map(|i| i.has_class(HIDDEN_CLASS)).collect()
    }

    #[test]
    fn pills_get_button_semantics() {
        let grid = grid();
        let state = StateManager::new();
        let _widget = setup(&grid, &state);
        for pill in &grid.pills {
            assert_eq!(pill.get_attribute("role").as_deref(), Some("button"));
            assert_eq!(pill.get_attribute("tabindex").as_deref(), Some("0"));
        }
        assert_eq!(grid.pills[0].get_attribute("aria-pressed").as_deref(), Some("true"));
        assert_eq!(grid.pills[1].get_attribute("aria-pressed").as_deref(), Some("false"));
    }

    #[test]
    fn clicks_filter_with_any_match() {
        let grid = grid();
        let state = StateManager::new();
        let _widget = setup(&grid, &state);
        grid.pills[1].dispatch(&DomEvent::new(EventKind::Click));
        grid.pills[3].dispatch(&DomEvent::new(EventKind::Click));
        assert_eq!(hidden(&grid), vec![false, true, false, false]);
        assert_eq!(
            state.get(&ACTIVE_FILTERS),
            Some(vec!["A".to_owned(), "C".to_owned()])
        );
        assert_eq!(grid.status.text_content(), "Showing 3 projects");
        assert_eq!(grid.pills[0].get_attribute("aria-pressed").as_deref(), Some("false"));
        assert!(grid.pills[1].has_class(ACTIVE_CLASS));
    }

    #[test]
    fn emptying_the_set_reverts_to_all() {
        let grid = grid();
        let state = StateManager::new();
        let widget = setup(&grid, &state);
        grid.pills[2].dispatch(&DomEvent::new(EventKind::Click));
        assert_eq!(hidden(&grid), vec![true, false, false, true]);
        grid.pills[2].dispatch(&DomEvent::new(EventKind::Click));
        assert!(widget.filters().is_all());
        assert_eq!(hidden(&grid), vec![false; 4]);
        assert_eq!(grid.pills[0].get_attribute("aria-pressed").as_deref(), Some("true"));
    }

    #[test]
    fn all_pill_clears_filters() {
        let grid = grid();
        let state = StateManager::new();
        let widget = setup(&grid, &state);
        widget.toggle("A");
        widget.toggle("B");
        grid.pills[0].dispatch(&DomEvent::new(EventKind::Click));
        assert!(widget.filters().is_all());
        assert_eq!(hidden(&grid), vec![false; 4]);
    }

    #[test]
    fn enter_and_space_toggle() {
        let grid = grid();
        let state = StateManager::new();
        let widget = setup(&grid, &state);
        let enter = DomEvent::key_down("Enter");
        grid.pills[3].dispatch(&enter);
        assert!(enter.default_prevented());
        assert!(widget.filters().contains("C"));
        grid.pills[3].dispatch(&DomEvent::key_down(" "));
        assert!(widget.filters().is_all());
        let tab = DomEvent::key_down("Tab");
        grid.pills[3].dispatch(&tab);
        assert!(!tab.default_prevented());
        assert!(widget.filters().is_all());
    }

    #[test]
    fn click_after_drag_is_ignored() {
        let grid = grid();
        let state = StateManager::new();
        let widget = setup(&grid, &state);
        state.set(&FILTER_DRAG_EVENT, true);
        grid.pills[1].dispatch(&DomEvent::new(EventKind::Click));
        assert!(widget.filters().is_all());
        state.set(&FILTER_DRAG_EVENT, false);
        grid.pills[1].dispatch(&DomEvent::new(EventKind::Click));
        assert!(widget.filters().contains("A"));
    }

    #[test]
    fn destroy_resets_and_detaches() {
        let grid = grid();
        let state = StateManager::new();
        let mut widget = setup(&grid, &state);
        widget.toggle("B");
        widget.destroy();
        assert_eq!(hidden(&grid), vec![false; 4]);
        assert!(!state.contains(&ACTIVE_FILTERS));
        for pill in &grid.pills {
            assert_eq!(pill.total_listeners(), 0);
            assert!(!pill.has_attribute("aria-pressed"));
            assert!(!pill.has_attribute("role"));
        }
        widget.destroy();
        grid.pills[1].dispatch(&DomEvent::new(EventKind::Click));
        assert_eq!(hidden(&grid), vec![false; 4]);
    }

    #[test]
    fn missing_items_give_an_inert_widget() {
        let doc = MemoryDocument::new();
        let root = doc.append_to_body("section");
        root.append("button").set_attribute("data-filter", "A");
        let widget = FilterWidget::setup(
            &root,
            &FilterSelectors::default(),
            Box::new(AllMatch),
            StateManager::new(),
            Locale::Ca,
        );
        assert!(widget.is_inert());
        widget.toggle("A");
        assert!(widget.filters().is_all());
    }
}
