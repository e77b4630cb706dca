//! Pure slider state machine; the controller maps DOM events onto it.

/// Which arrows accept input right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrows {
    /// Previous-slide arrow.
    pub prev: bool,
    /// Next-slide arrow.
    pub next: bool,
}

/// Index, animation and drag flags of one slider.
///
/// The index always stays in `[0, count - 1]`. While an animation or a
/// drag is in progress navigation requests are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderState {
    count: usize,
    current: usize,
    animating: bool,
    dragging: bool,
}

impl SliderState {
    /// A slider of `count` slides at index 0. `count` is at least 1.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            current: 0,
            animating: false,
            dragging: false,
        }
    }

    /// Number of slides.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current index.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether a programmatic scroll is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether the indicator is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn last(&self) -> usize {
        self.count - 1
    }

    /// Start animating to `index` (clamped). Returns the new index, or
    /// `None` when busy or already there.
    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if self.animating || self.dragging {
            return None;
        }
        let target = index.min(self.last());
        if target == self.current {
            return None;
        }
        self.current = target;
        self.animating = true;
        Some(target)
    }

    /// One slide forward.
    pub fn next(&mut self) -> Option<usize> {
        if self.current >= self.last() {
            return None;
        }
        self.go_to(self.current + 1)
    }

    /// One slide back.
    pub fn prev(&mut self) -> Option<usize> {
        let target = self.current.checked_sub(1)?;
        self.go_to(target)
    }

    /// Jump to the first slide.
    pub fn first(&mut self) -> Option<usize> {
        self.go_to(0)
    }

    /// Jump to the last slide.
    pub fn last_slide(&mut self) -> Option<usize> {
        self.go_to(self.last())
    }

    /// The programmatic scroll settled.
    pub fn finish_animation(&mut self) {
        self.animating = false;
    }

    /// Pointer grabbed the indicator. Refused while animating.
    pub fn begin_drag(&mut self) -> bool {
        if self.animating {
            return false;
        }
        self.dragging = true;
        true
    }

    /// Pointer released; the snap is still settling.
    pub fn release_drag(&mut self) {
        self.dragging = false;
    }

    /// Commit the index the track settled on after a drag.
    pub fn commit(&mut self, index: usize) -> bool {
        let index = index.min(self.last());
        let changed = index != self.current;
        self.current = index;
        changed
    }

    /// Native scroll landed near `index`. Ignored while animating or
    /// dragging. Returns whether the index changed.
    pub fn on_scroll(&mut self, index: usize) -> bool {
        if self.animating || self.dragging {
            return false;
        }
        self.commit(index)
    }

    /// Arrow availability: both off while animating, otherwise off only at
    /// the matching boundary.
    #[must_use]
    pub fn arrows(&self) -> Arrows {
        if self.animating {
            return Arrows {
                prev: false,
                next: false,
            };
        }
        Arrows {
            prev: self.current > 0,
            next: self.current < self.last(),
        }
    }

    /// Position in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.count <= 1 {
            0.0
        } else {
            self.current as f64 / self.last() as f64
        }
    }

    /// Slide whose progress-bar segment contains `fraction` of the bar.
    #[must_use]
    pub fn segment_at(&self, fraction: f64) -> usize {
        let fraction = fraction.clamp(0.0, 1.0);
        ((fraction * self.count as f64).floor() as usize).min(self.last())
    }

    /// Slide closest to a track scroll offset.
    #[must_use]
    pub fn nearest_index(&self, scroll_left: f64, max_scroll: f64) -> usize {
        if max_scroll <= 0.0 || self.count <= 1 {
            return 0;
        }
        let fraction = (scroll_left / max_scroll).clamp(0.0, 1.0);
        ((fraction * self.last() as f64).round() as usize).min(self.last())
    }

    /// Track scroll offset showing slide `index`.
    #[must_use]
    pub fn offset_of(&self, index: usize, max_scroll: f64) -> f64 {
        if self.count <= 1 {
            return 0.0;
        }
        max_scroll * index.min(self.last()) as f64 / self.last() as f64
    }
}
