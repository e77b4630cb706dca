use std::cell::Cell;

/// Platform-agnostic DOM event kinds the scripts listen for.
///
/// `Custom` carries the event type string for document-level signals such
/// as the navigation events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary-button activation.
    Click,
    /// Key pressed while the target has focus.
    KeyDown,
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer released.
    PointerUp,
    /// Pointer capture lost or gesture aborted by the browser.
    PointerCancel,
    /// Pointer left the element.
    PointerLeave,
    /// Scroll position changed.
    Scroll,
    /// Scrolling (including smooth scroll and snap) settled.
    ScrollEnd,
    /// Viewport resized.
    Resize,
    /// Document became interactive.
    DomContentLoaded,
    /// Any other event type, by name.
    Custom(String),
}

impl EventKind {
    /// The DOM event type string.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::PointerLeave => "pointerleave",
            Self::Scroll => "scroll",
            Self::ScrollEnd => "scrollend",
            Self::Resize => "resize",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Custom(name) => name,
        }
    }

    /// Shorthand for a custom event kind.
    #[must_use]
    pub fn custom(name: &str) -> Self {
        Self::Custom(name.to_owned())
    }
}

/// A DOM event as seen by the scripts.
///
/// Backends translate native events into this shape before dispatching,
/// and honour [`DomEvent::prevent_default`] once the handler returns.
#[derive(Debug, Clone)]
pub struct DomEvent {
    /// Which event fired.
    pub kind: EventKind,
    /// Pointer x in viewport pixels (0 for non-pointer events).
    pub client_x: f64,
    /// Pointer y in viewport pixels (0 for non-pointer events).
    pub client_y: f64,
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    /// An event with no pointer position or key.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            client_x: 0.0,
            client_y: 0.0,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Attach a pointer position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.client_x = x;
        self.client_y = y;
        self
    }

    /// A `keydown` event for the given `KeyboardEvent.key` value.
    #[must_use]
    pub fn key_down(key: &str) -> Self {
        Self {
            key: Some(key.to_owned()),
            ..Self::new(EventKind::KeyDown)
        }
    }

    /// Key value, if this is a key event.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Ask the backend to cancel the native default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a handler called [`DomEvent::prevent_default`].
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
