use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::{Arrows, SliderState};
use crate::dom::{Document, DomEvent, Element, EventKind, Listener, Timeout};
use crate::i18n::messages;
use crate::lifecycle::keys::SLIDER_INDEX;
use crate::lifecycle::StateManager;
use crate::util::Throttle;

/// Class on the track while the indicator is dragged.
pub const DRAGGING_CLASS: &str = "is-dragging";

/// Timing of one slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderConfig {
    /// Minimum interval between native scroll recomputations.
    pub scroll_throttle: Duration,
    /// Longest wait for a settle. Ends the wait on engines without
    /// `scrollend` and when the track never moves.
    pub settle_fallback: Duration,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            scroll_throttle: Duration::from_millis(100),
            settle_fallback: Duration::from_millis(500),
        }
    }
}

struct Parts<E> {
    root: E,
    track: E,
    prev: E,
    next: E,
    progress: Option<E>,
    indicator: Option<E>,
    position: Option<E>,
}

/// What to do once the track stops scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    FinishAnimation,
    CommitDrag,
}

struct Inner<D: Document> {
    document: D,
    parts: Parts<D::Element>,
    id: String,
    config: SliderConfig,
    machine: RefCell<SliderState>,
    state: StateManager,
    settle: Cell<Option<Settle>>,
    fallback: RefCell<Option<Timeout>>,
    throttle: RefCell<Throttle>,
    trailing: RefCell<Option<Timeout>>,
    weak: Weak<Self>,
}

impl<D: Document> Inner<D> {
    fn max_scroll(&self) -> f64 {
        self.parts.track.max_scroll_left()
    }

    fn navigate(&self, step: impl FnOnce(&mut SliderState) -> Option<usize>) {
        let Some(index) = step(&mut *self.machine.borrow_mut()) else {
            return;
        };
        let max_scroll = self.max_scroll();
        let target = self.machine.borrow().offset_of(index, max_scroll);
        // A track that does not move never fires `scrollend`.
        let stationary =
            max_scroll <= 0.0 || (target - self.parts.track.scroll_left()).abs() < 1.0;
        log::debug!("slider '{}': animating to {index}", self.id);
        self.parts.track.scroll_to_left(target, true);
        if stationary {
            self.machine.borrow_mut().finish_animation();
            self.render();
            return;
        }
        self.render();
        self.await_settle(Settle::FinishAnimation);
    }

    fn await_settle(&self, action: Settle) {
        self.settle.set(Some(action));
        let weak = self.weak.clone();
        let timeout = self.document.set_timeout(
            self.config.settle_fallback,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.settled();
                }
            }),
        );
        *self.fallback.borrow_mut() = Some(timeout);
    }

    fn settled(&self) {
        // Dropping a fired timeout is a no-op.
        drop(self.fallback.borrow_mut().take());
        match self.settle.take() {
            Some(Settle::FinishAnimation) => {
                self.machine.borrow_mut().finish_animation();
            }
            Some(Settle::CommitDrag) => {
                let index = {
                    let machine = self.machine.borrow();
                    machine.nearest_index(self.parts.track.scroll_left(), self.max_scroll())
                };
                let _ = self.machine.borrow_mut().commit(index);
                log::debug!("slider '{}': drag settled on {index}", self.id);
            }
            None => return,
        }
        self.render();
    }

    fn on_scroll(&self) {
        if self.settle.get().is_some() {
            return;
        }
        let now = self.document.now();
        let run = self.throttle.borrow_mut().should_run(now);
        if run {
            self.sync_from_scroll();
            return;
        }
        if self.trailing.borrow().is_some() {
            return;
        }
        let delay = self.throttle.borrow().remaining(now);
        let weak = self.weak.clone();
        let timeout = self.document.set_timeout(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    drop(inner.trailing.borrow_mut().take());
                    if inner.throttle.borrow_mut().take_pending() {
                        inner.throttle.borrow_mut().reset();
                        inner.on_scroll();
                    }
                }
            }),
        );
        *self.trailing.borrow_mut() = Some(timeout);
    }

    fn sync_from_scroll(&self) {
        let changed = {
            let mut machine = self.machine.borrow_mut();
            let index = machine.nearest_index(self.parts.track.scroll_left(), self.max_scroll());
            machine.on_scroll(index)
        };
        if changed {
            self.render();
        }
    }

    fn progress_fraction(&self, event: &DomEvent) -> Option<f64> {
        let bar = self.parts.progress.as_ref()?.rect();
        if bar.width <= 0.0 {
            return None;
        }
        Some(((event.client_x - bar.x) / bar.width).clamp(0.0, 1.0))
    }

    fn jump_to_pointer(&self, event: &DomEvent) {
        // The click synthesized after an indicator drag lands here too.
        if self.settle.get().is_some() {
            return;
        }
        let Some(fraction) = self.progress_fraction(event) else {
            return;
        };
        let segment = self.machine.borrow().segment_at(fraction);
        self.navigate(|m| m.go_to(segment));
    }

    fn begin_drag(&self, event: &DomEvent) {
        if !self.machine.borrow_mut().begin_drag() {
            return;
        }
        event.prevent_default();
        self.parts.track.add_class(DRAGGING_CLASS);
        self.parts.track.set_style("scroll-snap-type", "none");
        self.drag_to(event);
    }

    fn drag_to(&self, event: &DomEvent) {
        if !self.machine.borrow().is_dragging() {
            return;
        }
        let Some(fraction) = self.progress_fraction(event) else {
            return;
        };
        self.parts
            .track
            .scroll_to_left(fraction * self.max_scroll(), false);
        self.place_indicator(fraction);
    }

    fn end_drag(&self) {
        if !self.machine.borrow().is_dragging() {
            return;
        }
        self.machine.borrow_mut().release_drag();
        self.parts.track.remove_class(DRAGGING_CLASS);
        self.parts.track.remove_style("scroll-snap-type");
        self.await_settle(Settle::CommitDrag);
    }

    fn on_key(&self, event: &DomEvent) {
        type Step = fn(&mut SliderState) -> Option<usize>;
        let step: Step = match event.key() {
            Some("ArrowLeft") => SliderState::prev,
            Some("ArrowRight") => SliderState::next,
            Some("Home") => SliderState::first,
            Some("End") => SliderState::last_slide,
            _ => return,
        };
        event.prevent_default();
        self.navigate(step);
    }

    fn place_indicator(&self, fraction: f64) {
        let (Some(bar), Some(indicator)) = (&self.parts.progress, &self.parts.indicator) else {
            return;
        };
        let travel = (bar.rect().width - indicator.rect().width).max(0.0);
        indicator.set_style("transform", &format!("translateX({:.2}px)", fraction * travel));
    }

    fn render(&self) {
        let (current, count, progress, arrows) = {
            let m = self.machine.borrow();
            (m.current(), m.count(), m.progress(), m.arrows())
        };
        set_arrow(&self.parts.prev, arrows.prev);
        set_arrow(&self.parts.next, arrows.next);
        self.parts
            .root
            .set_style("--slider-progress", &format!("{progress:.4}"));
        if let Some(position) = &self.parts.position {
            position.set_text_content(&messages::slider_position(current, count));
        }
        if !self.machine.borrow().is_dragging() {
            self.place_indicator(progress);
        }
        self.state.set(&SLIDER_INDEX, (self.id.clone(), current));
    }
}

fn set_arrow<E: Element>(arrow: &E, enabled: bool) {
    if enabled {
        arrow.remove_attribute("disabled");
        arrow.set_attribute("aria-disabled", "false");
        arrow.remove_attribute("tabindex");
    } else {
        arrow.set_attribute("disabled", "");
        arrow.set_attribute("aria-disabled", "true");
        arrow.set_attribute("tabindex", "-1");
    }
}

/// A running slider bound to one `[data-slider]` root.
///
/// Dropping the handle removes every listener and pending timeout.
pub struct Slider<D: Document> {
    inner: Option<Rc<Inner<D>>>,
    listeners: Vec<Listener>,
}

impl<D: Document> std::fmt::Debug for Slider<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("state", &self.inner.as_ref().map(|i| i.machine.borrow().clone()))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<D: Document> Slider<D> {
    /// Bind the slider under `root`.
    ///
    /// Track, slides and both arrows are required; a missing one leaves an
    /// inert handle. Progress bar, indicator and position label are
    /// optional.
    pub fn setup(
        document: &D,
        root: &D::Element,
        config: SliderConfig,
        state: StateManager,
    ) -> Self {
        let id = root
            .get_attribute("data-slider")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| "slider".to_owned());
        let slides = root.query_selector_all("[data-slide]");
        let (Some(track), Some(prev), Some(next)) = (
            root.query_selector("[data-slider-track]"),
            root.query_selector("[data-slider-prev]"),
            root.query_selector("[data-slider-next]"),
        ) else {
            log::warn!("slider '{id}': track or arrows missing; slider is inert");
            return Self::inert();
        };
        if slides.is_empty() {
            log::warn!("slider '{id}': no slides; slider is inert");
            return Self::inert();
        }

        let parts = Parts {
            root: root.clone(),
            track,
            prev,
            next,
            progress: root.query_selector("[data-slider-progress]"),
            indicator: root.query_selector("[data-slider-indicator]"),
            position: root.query_selector("[data-slider-position]"),
        };
        let inner = Rc::new_cyclic(|weak| Inner {
            document: document.clone(),
            parts,
            throttle: RefCell::new(Throttle::new(config.scroll_throttle)),
            id,
            config,
            machine: RefCell::new(SliderState::new(slides.len())),
            state,
            settle: Cell::new(None),
            fallback: RefCell::new(None),
            trailing: RefCell::new(None),
            weak: weak.clone(),
        });

        let listeners = Self::bind(document, &inner);
        inner.render();
        log::debug!("slider '{}': {} slides", inner.id, slides.len());
        Self {
            inner: Some(inner),
            listeners,
        }
    }

    fn bind(document: &D, inner: &Rc<Inner<D>>) -> Vec<Listener> {
        let on = |f: fn(&Inner<D>, &DomEvent)| -> Box<dyn FnMut(&DomEvent)> {
            let weak = Rc::downgrade(inner);
            Box::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    f(&inner, event);
                }
            })
        };
        let parts = &inner.parts;
        let mut listeners = vec![
            parts
                .prev
                .listen(EventKind::Click, on(|i, _| i.navigate(SliderState::prev))),
            parts
                .next
                .listen(EventKind::Click, on(|i, _| i.navigate(SliderState::next))),
            parts.root.listen(EventKind::KeyDown, on(Inner::on_key)),
            parts.track.listen(EventKind::Scroll, on(|i, _| i.on_scroll())),
            document.listen_window(EventKind::PointerMove, on(Inner::drag_to)),
            document.listen_window(EventKind::PointerUp, on(|i, _| i.end_drag())),
            document.listen_window(EventKind::PointerCancel, on(|i, _| i.end_drag())),
        ];
        if document.supports_scroll_end() {
            listeners.push(
                parts
                    .track
                    .listen(EventKind::ScrollEnd, on(|i, _| i.settled())),
            );
        }
        if let Some(progress) = &parts.progress {
            listeners.push(progress.listen(EventKind::Click, on(Inner::jump_to_pointer)));
        }
        if let Some(indicator) = &parts.indicator {
            listeners.push(indicator.listen(EventKind::PointerDown, on(Inner::begin_drag)));
        }
        listeners
    }

    /// A handle with nothing bound.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            inner: None,
            listeners: Vec::new(),
        }
    }

    /// Whether setup found nothing to bind.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Current index (0 for an inert slider).
    #[must_use]
    pub fn current(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.machine.borrow().current())
    }

    /// Whether a programmatic scroll is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.machine.borrow().is_animating())
    }

    /// Arrow availability, `None` for an inert slider.
    #[must_use]
    pub fn arrows(&self) -> Option<Arrows> {
        self.inner.as_ref().map(|inner| inner.machine.borrow().arrows())
    }

    /// Animate to `index` (clamped).
    pub fn go_to(&self, index: usize) {
        if let Some(inner) = &self.inner {
            inner.navigate(|m| m.go_to(index));
        }
    }

    /// Detach everything. Idempotent.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        if let Some(inner) = self.inner.take() {
            drop(inner.fallback.borrow_mut().take());
            drop(inner.trailing.borrow_mut().take());
            inner.parts.track.remove_class(DRAGGING_CLASS);
            inner.parts.track.remove_style("scroll-snap-type");
        }
    }
}

impl<D: Document> Drop for Slider<D> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDocument, MemoryElement};
    use crate::dom::Rect;

    struct Fixture {
        doc: MemoryDocument,
        root: MemoryElement,
        track: MemoryElement,
        prev: MemoryElement,
        next: MemoryElement,
        progress: MemoryElement,
        indicator: MemoryElement,
        position: MemoryElement,
    }

    fn fixture(scroll_end: bool) -> Fixture {
        let doc = MemoryDocument::new();
        doc.set_scroll_end_support(scroll_end);
        let root = doc.append_to_body("section");
        root.set_attribute("data-slider", "work");
        let track = root.append("div");
        track.set_attribute("data-slider-track", "");
        track.set_scroll_metrics(5000.0, 1000.0);
        for _ in 0..5 {
            track.append("figure").set_attribute("data-slide", "");
        }
        let prev = root.append("button");
        prev.set_attribute("data-slider-prev", "");
        let next = root.append("button");
        next.set_attribute("data-slider-next", "");
        let progress = root.append("div");
        progress.set_attribute("data-slider-progress", "");
        progress.set_rect(Rect::new(100.0, 700.0, 500.0, 4.0));
        let indicator = progress.append("span");
        indicator.set_attribute("data-slider-indicator", "");
        indicator.set_rect(Rect::new(100.0, 700.0, 100.0, 4.0));
        let position = root.append("span");
        position.set_attribute("data-slider-position", "");
        Fixture {
            doc,
            root,
            track,
            prev,
            next,
            progress,
            indicator,
            position,
        }
    }

    fn setup(f: &Fixture, state: &StateManager) -> Slider<MemoryDocument> {
        Slider::setup(&f.doc, &f.root, SliderConfig::default(), state.clone())
    }

    fn click(el: &MemoryElement) {
        el.dispatch(&DomEvent::new(EventKind::Click));
    }

    fn settle(f: &Fixture) {
        f.track.dispatch(&DomEvent::new(EventKind::ScrollEnd));
    }

    #[test]
    fn initial_render_disables_prev() {
        let f = fixture(true);
        let state = StateManager::new();
        let _slider = setup(&f, &state);
        assert!(f.prev.has_attribute("disabled"));
        assert_eq!(f.prev.get_attribute("tabindex").as_deref(), Some("-1"));
        assert_eq!(f.next.get_attribute("aria-disabled").as_deref(), Some("false"));
        assert_eq!(f.position.text_content(), "01 / 05");
        assert_eq!(state.get(&SLIDER_INDEX), Some(("work".to_owned(), 0)));
    }

    #[test]
    fn arrows_walk_to_the_last_slide() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        for expected in 1..=4 {
            click(&f.next);
            assert!(slider.is_animating());
            assert!(f.prev.has_attribute("disabled"));
            assert!(f.next.has_attribute("disabled"));
            settle(&f);
            assert_eq!(slider.current(), expected);
        }
        assert!((f.track.scroll_left() - 4000.0).abs() < 1e-9);
        assert!(f.next.has_attribute("disabled"));
        assert!(!f.prev.has_attribute("disabled"));
        click(&f.next);
        assert_eq!(slider.current(), 4);
        assert!(!slider.is_animating());
        assert_eq!(f.position.text_content(), "05 / 05");
    }

    #[test]
    fn clicks_during_animation_are_ignored() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        click(&f.next);
        click(&f.next);
        settle(&f);
        assert_eq!(slider.current(), 1);
    }

    #[test]
    fn fallback_timeout_ends_animation_without_scroll_end() {
        let f = fixture(false);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        click(&f.next);
        assert!(slider.is_animating());
        f.doc.advance(Duration::from_millis(499));
        assert!(slider.is_animating());
        f.doc.advance(Duration::from_millis(1));
        assert!(!slider.is_animating());
        assert_eq!(slider.arrows(), Some(Arrows { prev: true, next: true }));
    }

    #[test]
    fn target_at_current_offset_settles_at_once() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        f.track.set_scroll_left(1000.0);
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        f.doc.advance(Duration::from_millis(10));
        f.track.set_scroll_left(2000.0);
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        assert_eq!(slider.current(), 1);

        // The swipe already sits on slide 2, so the track never moves.
        click(&f.next);
        assert_eq!(slider.current(), 2);
        assert!(!slider.is_animating());
        assert_eq!(slider.arrows(), Some(Arrows { prev: true, next: true }));
        f.doc.advance(Duration::from_millis(100));
        assert_eq!(slider.current(), 2);

        f.root.dispatch(&DomEvent::key_down("ArrowRight"));
        assert!(slider.is_animating());
        settle(&f);
        assert_eq!(slider.current(), 3);
    }

    #[test]
    fn track_without_overflow_never_locks() {
        let f = fixture(true);
        f.track.set_scroll_metrics(1000.0, 1000.0);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        click(&f.next);
        assert_eq!(slider.current(), 1);
        assert!(!slider.is_animating());
        assert_eq!(slider.arrows(), Some(Arrows { prev: true, next: true }));
        assert!(!f.next.has_attribute("disabled"));
    }

    #[test]
    fn fallback_timeout_backs_up_scroll_end() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        // Press and release without moving: no scroll, no `scrollend`.
        f.indicator
            .dispatch(&DomEvent::new(EventKind::PointerDown).at(100.0, 702.0));
        f.doc.dispatch_window(&DomEvent::new(EventKind::PointerUp));
        f.doc.advance(Duration::from_millis(500));
        assert_eq!(slider.current(), 0);

        // Native scroll is tracked again once the wait is over.
        f.track.set_scroll_left(3000.0);
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        assert_eq!(slider.current(), 3);
        click(&f.next);
        assert!(slider.is_animating());
    }

    #[test]
    fn keyboard_shares_the_arrow_path() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        let end = DomEvent::key_down("End");
        f.next.dispatch(&end);
        assert!(end.default_prevented());
        let ignored = DomEvent::key_down("ArrowLeft");
        f.root.dispatch(&ignored);
        settle(&f);
        assert_eq!(slider.current(), 4);
        f.root.dispatch(&DomEvent::key_down("ArrowLeft"));
        settle(&f);
        assert_eq!(slider.current(), 3);
        f.root.dispatch(&DomEvent::key_down("Home"));
        settle(&f);
        assert_eq!(slider.current(), 0);
    }

    #[test]
    fn progress_click_jumps_to_segment() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        f.progress
            .dispatch(&DomEvent::new(EventKind::Click).at(100.0 + 500.0 * 0.65, 702.0));
        settle(&f);
        assert_eq!(slider.current(), 3);
        assert_eq!(f.root.style("--slider-progress").as_deref(), Some("0.7500"));
    }

    #[test]
    fn drag_suppresses_snap_and_commits_on_settle() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        f.indicator
            .dispatch(&DomEvent::new(EventKind::PointerDown).at(100.0, 702.0));
        assert!(f.track.has_class(DRAGGING_CLASS));
        assert_eq!(f.track.style("scroll-snap-type").as_deref(), Some("none"));
        f.doc
            .dispatch_window(&DomEvent::new(EventKind::PointerMove).at(100.0 + 250.0, 702.0));
        assert!((f.track.scroll_left() - 2000.0).abs() < 1e-9);
        // Native scroll during a drag does not move the index.
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        assert_eq!(slider.current(), 0);
        f.doc.dispatch_window(&DomEvent::new(EventKind::PointerUp));
        assert!(!f.track.has_class(DRAGGING_CLASS));
        assert_eq!(slider.current(), 0);
        settle(&f);
        assert_eq!(slider.current(), 2);
    }

    #[test]
    fn native_scroll_is_throttled() {
        let f = fixture(true);
        let state = StateManager::new();
        let slider = setup(&f, &state);
        f.track.set_scroll_left(1000.0);
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        assert_eq!(slider.current(), 1);
        f.doc.advance(Duration::from_millis(10));
        f.track.set_scroll_left(3000.0);
        f.track.dispatch(&DomEvent::new(EventKind::Scroll));
        assert_eq!(slider.current(), 1);
        f.doc.advance(Duration::from_millis(90));
        assert_eq!(slider.current(), 3);
        assert_eq!(f.position.text_content(), "04 / 05");
    }

    #[test]
    fn destroy_detaches_everything() {
        let f = fixture(false);
        let state = StateManager::new();
        let mut slider = setup(&f, &state);
        click(&f.next);
        assert_eq!(f.doc.pending_timeouts(), 1);
        slider.destroy();
        assert_eq!(f.doc.pending_timeouts(), 0);
        assert_eq!(f.next.total_listeners(), 0);
        assert_eq!(f.doc.window_listener_count(&EventKind::PointerMove), 0);
        slider.destroy();
        assert!(slider.is_inert());
    }

    #[test]
    fn missing_track_gives_an_inert_handle() {
        let doc = MemoryDocument::new();
        let root = doc.append_to_body("section");
        root.append("button").set_attribute("data-slider-next", "");
        let slider = Slider::setup(&doc, &root, SliderConfig::default(), StateManager::new());
        assert!(slider.is_inert());
        slider.go_to(3);
        assert_eq!(slider.current(), 0);
    }
}
