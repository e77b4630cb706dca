//! DOM abstraction the scripts are written against.
//!
//! Scripts never call `web-sys` directly. They take a [`Document`] and work
//! with its [`Element`] handles, attaching handlers that receive
//! platform-agnostic [`DomEvent`]s. Every attachment hands back a guard
//! ([`Listener`] or [`Timeout`]) that releases it when dropped, so a
//! script's teardown is simply "drop everything you acquired".
//!
//! Two backends exist: [`memory`] (in-process, used by tests and native
//! tooling) and `web` (browser, behind the `web` feature).

pub mod cache;
mod event;
pub mod memory;
mod selector;
#[cfg(feature = "web")]
pub mod web;

use std::time::Duration;

pub use event::{DomEvent, EventKind};

/// Boxed event handler.
pub type Handler = Box<dyn FnMut(&DomEvent)>;

/// Axis-aligned box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Rectangle from position and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Guard for an attached event listener or observer.
///
/// Dropping the guard detaches it. [`Listener::remove`] may be called any
/// number of times; only the first call does anything.
#[must_use = "dropping a Listener detaches it immediately"]
pub struct Listener {
    release: Option<Box<dyn FnOnce()>>,
}

impl Listener {
    /// Wrap a release action.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Detach now.
    pub fn remove(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("attached", &self.release.is_some())
            .finish()
    }
}

/// Guard for a pending timeout. Dropping it cancels the callback.
#[must_use = "dropping a Timeout cancels it"]
pub struct Timeout {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Timeout {
    /// Wrap a cancel action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel the callback if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeout")
            .field("pending", &self.cancel.is_some())
            .finish()
    }
}

/// A handle to one DOM element.
///
/// Handles are cheap to clone; clones refer to the same node.
pub trait Element: Clone + 'static {
    /// Attribute value, if present.
    fn get_attribute(&self, name: &str) -> Option<String>;
    /// Set an attribute.
    fn set_attribute(&self, name: &str, value: &str);
    /// Remove an attribute (no-op when absent).
    fn remove_attribute(&self, name: &str);
    /// Whether the attribute is present.
    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Add a class.
    fn add_class(&self, class: &str);
    /// Remove a class.
    fn remove_class(&self, class: &str);
    /// Whether the class is set.
    fn has_class(&self, class: &str) -> bool;
    /// Add or remove a class.
    fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Set an inline style property (CSS custom properties included).
    fn set_style(&self, property: &str, value: &str);
    /// Remove an inline style property.
    fn remove_style(&self, property: &str);
    /// Inline style property value.
    fn style(&self, property: &str) -> Option<String>;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;
    /// Replace all children with a single text node.
    fn set_text_content(&self, text: &str);
    /// Serialized children.
    fn inner_html(&self) -> String;
    /// Replace children with parsed markup.
    fn set_inner_html(&self, html: &str);
    /// Append `child`, moving it out of its current parent.
    fn append_child(&self, child: &Self);

    /// First matching descendant.
    fn query_selector(&self, selector: &str) -> Option<Self>;
    /// All matching descendants in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    /// Border box relative to the viewport.
    fn rect(&self) -> Rect;
    /// `offsetTop` relative to the offset parent.
    fn offset_top(&self) -> f64;
    /// Current horizontal scroll offset.
    fn scroll_left(&self) -> f64;
    /// Scroll horizontally, optionally with smooth behaviour.
    fn scroll_to_left(&self, left: f64, smooth: bool);
    /// Full scrollable width.
    fn scroll_width(&self) -> f64;
    /// Visible width.
    fn client_width(&self) -> f64;
    /// Largest valid `scroll_left`.
    fn max_scroll_left(&self) -> f64 {
        (self.scroll_width() - self.client_width()).max(0.0)
    }

    /// Attach an event handler; the listener stays attached until the
    /// returned guard is dropped.
    fn listen(&self, kind: EventKind, handler: Handler) -> Listener;

    /// Whether both handles refer to the same node.
    fn same_node(&self, other: &Self) -> bool;
}

/// The page-level view of the DOM: queries, window events, timers and
/// observers.
pub trait Document: Clone + 'static {
    /// Element handle type of this backend.
    type Element: Element;

    /// First matching element in the document.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;
    /// All matching elements in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;
    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Option<Self::Element>;

    /// Attach a handler on `window` (scroll, resize).
    fn listen_window(&self, kind: EventKind, handler: Handler) -> Listener;
    /// Attach a handler on `document` (custom navigation signals,
    /// `DOMContentLoaded`).
    fn listen_document(&self, kind: EventKind, handler: Handler) -> Listener;

    /// Run `callback` after `delay` unless the guard is dropped first.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>)
        -> Timeout;

    /// Report intersection changes of `element` with the viewport.
    /// `threshold` is the visible fraction (0..=1) that counts as visible.
    fn observe_visibility(
        &self,
        element: &Self::Element,
        threshold: f64,
        callback: Box<dyn FnMut(bool)>,
    ) -> Listener;

    /// Vertical window scroll offset.
    fn scroll_y(&self) -> f64;
    /// Viewport `(width, height)`.
    fn viewport(&self) -> (f64, f64);
    /// Monotonic time since the document was created.
    fn now(&self) -> Duration;
    /// Whether the engine fires `scrollend`.
    fn supports_scroll_end(&self) -> bool;
    /// Whether `readyState` is past `loading`.
    fn is_interactive(&self) -> bool;
}
