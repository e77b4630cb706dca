//! Sticky header state and the mobile menu drawer.

use std::rc::Rc;

use crate::dom::cache::{ElementCache, HEADER, MOBILE_MENU};
use crate::dom::{Document, Element, EventKind, Listener};
use crate::lifecycle::Disposer;

/// Class on the header once the page has scrolled past the threshold.
pub const SCROLLED_CLASS: &str = "is-scrolled";
/// Class on the open mobile menu.
pub const OPEN_CLASS: &str = "is-open";
/// Button toggling the mobile menu.
pub const TOGGLE_SELECTOR: &str = "[data-menu-toggle]";

fn set_menu<E: Element>(menu: &E, toggle: Option<&E>, open: bool) {
    menu.toggle_class(OPEN_CLASS, open);
    menu.set_attribute("aria-hidden", if open { "false" } else { "true" });
    if let Some(toggle) = toggle {
        toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
    }
}

/// Bind the cached header and mobile menu. Either may be absent.
pub fn setup<D: Document>(
    document: &D,
    cache: &ElementCache<D>,
    scroll_threshold: f64,
) -> Disposer {
    let mut listeners: Vec<Listener> = Vec::new();
    let header = cache.get(HEADER);

    if let Some(header) = &header {
        let update = {
            let (doc, header) = (document.clone(), header.clone());
            move || header.toggle_class(SCROLLED_CLASS, doc.scroll_y() > scroll_threshold)
        };
        update();
        listeners.push(document.listen_window(EventKind::Scroll, Box::new(move |_| update())));
    }

    let menu = cache.get(MOBILE_MENU);
    let toggle = header
        .as_ref()
        .and_then(|h| h.query_selector(TOGGLE_SELECTOR))
        .or_else(|| document.query_selector(TOGGLE_SELECTOR));
    if let Some(menu) = &menu {
        let parts = Rc::new((menu.clone(), toggle.clone()));
        set_menu(menu, toggle.as_ref(), false);
        if let Some(toggle) = &toggle {
            let parts = Rc::clone(&parts);
            listeners.push(toggle.listen(
                EventKind::Click,
                Box::new(move |_| {
                    let (menu, toggle) = &*parts;
                    set_menu(menu, toggle.as_ref(), !menu.has_class(OPEN_CLASS));
                }),
            ));
        }
        listeners.push(document.listen_document(
            EventKind::KeyDown,
            Box::new(move |event| {
                let (menu, toggle) = &*parts;
                if event.key() == Some("Escape") && menu.has_class(OPEN_CLASS) {
                    set_menu(menu, toggle.as_ref(), false);
                }
            }),
        ));
    } else {
        log::debug!("header: no mobile menu on this page");
    }

    Disposer::new(move || {
        drop(listeners);
        if let Some(header) = &header {
            header.remove_class(SCROLLED_CLASS);
        }
        if let Some(menu) = &menu {
            set_menu(menu, toggle.as_ref(), false);
        }
    })
}
