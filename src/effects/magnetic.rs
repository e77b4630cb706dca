//! Elements that lean towards the pointer.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{Document, DomEvent, Element, EventKind, Listener};
use crate::lifecycle::Disposer;

/// Magnetic cursor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticConfig {
    /// Elements that follow the pointer.
    pub selector: String,
    /// Fraction of the pointer's distance from the centre applied as
    /// offset, unless the element's `data-magnetic` value overrides it.
    pub strength: f64,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            selector: "[data-magnetic]".to_owned(),
            strength: 0.3,
        }
    }
}

/// Offset of an element whose box is `rect` for a pointer at `(x, y)`.
#[must_use]
pub fn offset(rect: &crate::dom::Rect, x: f64, y: f64, strength: f64) -> (f64, f64) {
    let (cx, cy) = rect.center();
    (strength * (x - cx), strength * (y - cy))
}

/// `element.rect()` includes the applied transform; `applied` holds it so
/// the offset is measured from the resting box.
fn follow<E: Element>(element: &E, applied: &Cell<(f64, f64)>, strength: f64, event: &DomEvent) {
    let (ax, ay) = applied.get();
    let mut rect = element.rect();
    rect.x -= ax;
    rect.y -= ay;
    let (dx, dy) = offset(&rect, event.client_x, event.client_y, strength);
    applied.set((dx, dy));
    element.set_style("transform", &format!("translate3d({dx:.2}px, {dy:.2}px, 0)"));
}

/// Bind every matching element. The disposer detaches and clears the
/// inline transforms.
pub fn setup<D: Document>(document: &D, config: &MagneticConfig) -> Disposer {
    let elements = document.query_selector_all(&config.selector);
    let mut listeners: Vec<Listener> = Vec::with_capacity(elements.len() * 2);
    for element in &elements {
        let strength = element
            .get_attribute("data-magnetic")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(config.strength);

        let applied = Rc::new(Cell::new((0.0, 0.0)));

        let (target, moved) = (element.clone(), Rc::clone(&applied));
        listeners.push(element.listen(
            EventKind::PointerMove,
            Box::new(move |event| follow(&target, &moved, strength, event)),
        ));
        let target = element.clone();
        listeners.push(element.listen(
            EventKind::PointerLeave,
            Box::new(move |_| {
                applied.set((0.0, 0.0));
                target.remove_style("transform");
            }),
        ));
    }
    log::debug!("magnetic: {} elements", elements.len());
    Disposer::new(move || {
        drop(listeners);
        for element in &elements {
            element.remove_style("transform");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDocument;
    use crate::dom::Rect;

    #[test]
    fn follows_pointer_and_resets_on_leave() {
        let doc = MemoryDocument::new();
        let button = doc.append_to_body("a");
        button.set_attribute("data-magnetic", "");
        button.set_rect(Rect::new(100.0, 100.0, 100.0, 40.0));
        let disposer = setup(&doc, &MagneticConfig::default());

        button.dispatch(&DomEvent::new(EventKind::PointerMove).at(160.0, 110.0));
        assert_eq!(
            button.style("transform").as_deref(),
            Some("translate3d(3.00px, -3.00px, 0)")
        );
        button.dispatch(&DomEvent::new(EventKind::PointerLeave));
        assert_eq!(button.style("transform"), None);

        assert!(disposer.dispose().is_ok());
        assert_eq!(button.total_listeners(), 0);
    }

    #[test]
    fn offset_ignores_its_own_transform() {
        let doc = MemoryDocument::new();
        let button = doc.append_to_body("a");
        button.set_attribute("data-magnetic", "");
        button.set_rect(Rect::new(100.0, 100.0, 100.0, 40.0));
        let _disposer = setup(&doc, &MagneticConfig::default());

        button.dispatch(&DomEvent::new(EventKind::PointerMove).at(160.0, 110.0));
        // The browser reports the translated box on the next move.
        button.set_rect(Rect::new(103.0, 97.0, 100.0, 40.0));
        button.dispatch(&DomEvent::new(EventKind::PointerMove).at(160.0, 110.0));
        assert_eq!(
            button.style("transform").as_deref(),
            Some("translate3d(3.00px, -3.00px, 0)")
        );

        button.dispatch(&DomEvent::new(EventKind::PointerLeave));
        button.set_rect(Rect::new(100.0, 100.0, 100.0, 40.0));
        button.dispatch(&DomEvent::new(EventKind::PointerMove).at(200.0, 120.0));
        assert_eq!(
            button.style("transform").as_deref(),
            Some("translate3d(15.00px, 0.00px, 0)")
        );
    }

    #[test]
    fn attribute_overrides_strength() {
        let doc = MemoryDocument::new();
        let link = doc.append_to_body("a");
        link.set_attribute("data-magnetic", "0.5");
        link.set_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let _disposer = setup(&doc, &MagneticConfig::default());
        link.dispatch(&DomEvent::new(EventKind::PointerMove).at(20.0, 10.0));
        assert_eq!(
            link.style("transform").as_deref(),
            Some("translate3d(5.00px, 0.00px, 0)")
        );
    }
}
