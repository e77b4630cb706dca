use std::collections::BTreeSet;

/// Reserved pill value that clears every filter.
pub const ALL: &str = "all";

/// The set of active filter tags.
///
/// An empty set is the "all" state: nothing is filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    active: BTreeSet<String>,
}

impl FilterSet {
    /// The "all" state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set with the given tags active. The reserved `all` value is ignored.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: tags
                .into_iter()
                .map(Into::into)
                .filter(|t| t != ALL)
                .collect(),
        }
    }

    /// Flip `tag`. Toggling [`ALL`] clears the set. Returns whether `tag`
    /// is active afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if tag == ALL {
            self.clear();
            return true;
        }
        if self.active.remove(tag) {
            false
        } else {
            let _ = self.active.insert(tag.to_owned());
            true
        }
    }

    /// Back to the "all" state.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Whether no filter is active.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether `tag` is active. [`ALL`] is active exactly in the "all" state.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        if tag == ALL {
            self.is_all()
        } else {
            self.active.contains(tag)
        }
    }

    /// Active tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Number of active tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Same as [`FilterSet::is_all`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active tags as an owned list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }
}

/// Split a `data-tags` value on commas and whitespace.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
