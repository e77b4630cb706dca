//! Vertical scrolling through a tall section drives a horizontal track.

use crate::dom::cache::{ElementCache, HORIZONTAL_SCROLL};
use crate::dom::{Document, Element, EventKind, Rect};
use crate::lifecycle::Disposer;

/// Track selector inside the section.
pub const TRACK_SELECTOR: &str = "[data-horizontal-track]";

/// How far through the section the window is, in `[0, 1]`.
///
/// `section` is the section's viewport-relative box; the section is pinned
/// while its top has scrolled past the viewport top and its bottom has not
/// reached the viewport bottom.
#[must_use]
pub fn progress(section: &Rect, viewport_height: f64) -> f64 {
    let distance = section.height - viewport_height;
    if distance <= 0.0 {
        return 0.0;
    }
    (-section.y / distance).clamp(0.0, 1.0)
}

/// Horizontal translation of the track for `progress`.
#[must_use]
pub fn translation(progress: f64, track_width: f64, viewport_width: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    -progress * (track_width - viewport_width).max(0.0)
}

fn update<D: Document>(document: &D, section: &D::Element, track: &D::Element) {
    let (width, height) = document.viewport();
    let p = progress(&section.rect(), height);
    let x = translation(p, track.scroll_width(), width);
    track.set_style("transform", &format!("translate3d({x:.2}px, 0, 0)"));
    section.set_style("--horizontal-progress", &format!("{p:.4}"));
}

/// Bind the cached horizontal-scroll section, if the page has one.
pub fn setup<D: Document>(document: &D, cache: &ElementCache<D>) -> Option<Disposer> {
    let section = cache.get(HORIZONTAL_SCROLL)?;
    let Some(track) = section.query_selector(TRACK_SELECTOR) else {
        log::warn!("horizontal scroll: section has no track");
        return None;
    };
    update(document, &section, &track);

    let listeners: Vec<_> = [EventKind::Scroll, EventKind::Resize]
        .into_iter()
        .map(|kind| {
            let (doc, section, track) = (document.clone(), section.clone(), track.clone());
            document.listen_window(kind, Box::new(move |_| update(&doc, &section, &track)))
        })
        .collect();

    Some(Disposer::new(move || {
        drop(listeners);
        track.remove_style("transform");
        section.remove_style("--horizontal-progress");
    }))
}
