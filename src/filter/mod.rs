//! Tag filtering for project grids.
//!
//! A [`FilterWidget`] binds pills (`[data-filter]`) to items
//! (`[data-tags]`). Which items stay visible for a given [`FilterSet`] is
//! decided by a [`FilterBehavior`]; [`AnyMatch`] is the default and keeps
//! every item sharing at least one tag with the active set, [`AllMatch`]
//! keeps only items carrying every active tag.

mod set;
mod widget;

pub use set::{parse_tags, FilterSet, ALL};
pub use widget::{FilterSelectors, FilterWidget, ACTIVE_CLASS, HIDDEN_CLASS};

/// Match predicate and hooks of one filter flavour.
pub trait FilterBehavior {
    /// Whether an item with `item_tags` stays visible under a non-empty
    /// `filters` set.
    fn matches(&self, item_tags: &[String], filters: &FilterSet) -> bool;

    /// Filters active when the widget starts.
    fn initial(&self) -> FilterSet {
        FilterSet::new()
    }

    /// Called after every change with the number of visible items.
    fn on_change(&self, _filters: &FilterSet, _visible: usize) {}
}

/// Visible when the item has any active tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMatch;

impl FilterBehavior for AnyMatch {
    fn matches(&self, item_tags: &[String], filters: &FilterSet) -> bool {
        item_tags.iter().any(|t| filters.contains(t))
    }
}

/// Visible when the item has every active tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMatch;

impl FilterBehavior for AllMatch {
    fn matches(&self, item_tags: &[String], filters: &FilterSet) -> bool {
        filters.iter().all(|f| item_tags.iter().any(|t| t == f))
    }
}

/// Indices of the items visible under `filters`. Everything is visible in
/// the "all" state.
#[must_use]
pub fn visible_indices(
    items: &[Vec<String>],
    filters: &FilterSet,
    behavior: &dyn FilterBehavior,
) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, tags)| filters.is_all() || behavior.matches(tags, filters))
        .map(|(i, _)| i)
        .collect()
}
