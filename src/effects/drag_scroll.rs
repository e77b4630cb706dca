//! Pointer-drag scrolling for horizontal pill rows.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Document, DomEvent, Element, EventKind, Listener, Timeout};
use crate::lifecycle::keys::FILTER_DRAG_EVENT;
use crate::lifecycle::{Disposer, StateManager};

/// Class on a row while it is being dragged.
pub const DRAGGING_CLASS: &str = "is-dragging";

/// Drag scroll settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DragScrollConfig {
    /// Rows that scroll with the pointer.
    pub selector: String,
    /// Pointer travel (px) that turns a press into a drag.
    pub threshold: f64,
    /// How long the drag flag stays raised after release.
    pub flag_reset: Duration,
}

impl Default for DragScrollConfig {
    fn default() -> Self {
        Self {
            selector: "[data-drag-scroll]".to_owned(),
            threshold: 5.0,
            flag_reset: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f64,
    start_scroll: f64,
    moved: bool,
}

struct Row<D: Document> {
    document: D,
    element: D::Element,
    state: StateManager,
    threshold: f64,
    flag_reset: Duration,
    press: Cell<Option<Press>>,
    reset: RefCell<Option<Timeout>>,
}

impl<D: Document> Row<D> {
    fn down(&self, event: &DomEvent) {
        self.press.set(Some(Press {
            start_x: event.client_x,
            start_scroll: self.element.scroll_left(),
            moved: false,
        }));
    }

    fn moved(&self, event: &DomEvent) {
        let Some(mut press) = self.press.get() else {
            return;
        };
        let dx = event.client_x - press.start_x;
        if !press.moved && dx.abs() > self.threshold {
            press.moved = true;
            self.element.add_class(DRAGGING_CLASS);
        }
        if press.moved {
            event.prevent_default();
            self.element.scroll_to_left(press.start_scroll - dx, false);
        }
        self.press.set(Some(press));
    }

    fn up(&self) {
        let Some(press) = self.press.take() else {
            return;
        };
        self.element.remove_class(DRAGGING_CLASS);
        if !press.moved {
            return;
        }
        self.state.set(&FILTER_DRAG_EVENT, true);
        let state = self.state.clone();
        let timeout = self.document.set_timeout(
            self.flag_reset,
            Box::new(move || {
                let _ = state.delete(&FILTER_DRAG_EVENT);
            }),
        );
        *self.reset.borrow_mut() = Some(timeout);
    }
}

/// Bind every matching row. The disposer detaches, cancels a pending flag
/// reset and lowers the flag.
pub fn setup<D: Document>(
    document: &D,
    state: &StateManager,
    config: &DragScrollConfig,
) -> Disposer {
    let rows: Vec<Rc<Row<D>>> = document
        .query_selector_all(&config.selector)
        .into_iter()
        .map(|element| {
            Rc::new(Row {
                document: document.clone(),
                element,
                state: state.clone(),
                threshold: config.threshold,
                flag_reset: config.flag_reset,
                press: Cell::new(None),
                reset: RefCell::new(None),
            })
        })
        .collect();

    let mut listeners: Vec<Listener> = Vec::with_capacity(rows.len() * 4);
    for row in &rows {
        let r = Rc::downgrade(row);
        listeners.push(row.element.listen(
            EventKind::PointerDown,
            Box::new(move |e| {
                if let Some(row) = r.upgrade() {
                    row.down(e);
                }
            }),
        ));
        let r = Rc::downgrade(row);
        listeners.push(document.listen_window(
            EventKind::PointerMove,
            Box::new(move |e| {
                if let Some(row) = r.upgrade() {
                    row.moved(e);
                }
            }),
        ));
        for kind in [EventKind::PointerUp, EventKind::PointerCancel] {
            let r = Rc::downgrade(row);
            listeners.push(document.listen_window(
                kind,
                Box::new(move |_| {
                    if let Some(row) = r.upgrade() {
                        row.up();
                    }
                }),
            ));
        }
    }
    log::debug!("drag scroll: {} rows", rows.len());

    let state = state.clone();
    Disposer::new(move || {
        drop(listeners);
        for row in &rows {
            drop(row.reset.borrow_mut().take());
            row.element.remove_class(DRAGGING_CLASS);
        }
        let _ = state.delete(&FILTER_DRAG_EVENT);
    })
}
