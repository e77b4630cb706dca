//! In-process DOM backend.
//!
//! A small element tree with attributes, classes, inline styles, text and
//! explicit geometry, plus a manual clock for timeouts. Nothing is laid out
//! or parsed: tests set geometry and scroll metrics directly, and
//! [`MemoryElement::set_inner_html`] stores markup verbatim as text.
//!
//! ```ignore
//! let doc = MemoryDocument::new();
//! let button = doc.append_to_body("button");
//! button.add_class("pill");
//! let _guard = button.listen(EventKind::Click, Box::new(|_| { /* ... */ }));
//! button.dispatch(&DomEvent::new(EventKind::Click));
//! doc.advance(Duration::from_millis(500)); // fire due timeouts
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::selector::{Matchable, SelectorList};
use super::{Document, DomEvent, Element, EventKind, Handler, Listener, Rect, Timeout};

// ── Listener table ───────────────────────────────────────────────────────

type SharedHandler = Rc<RefCell<Handler>>;

#[derive(Default)]
struct ListenerTable {
    entries: RefCell<Vec<(u64, EventKind, SharedHandler)>>,
    next_id: Cell<u64>,
}

impl ListenerTable {
    fn add(self: &Rc<Self>, kind: EventKind, handler: Handler) -> Listener {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries
            .borrow_mut()
            .push((id, kind, Rc::new(RefCell::new(handler))));
        let table = Rc::downgrade(self);
        Listener::new(move || {
            if let Some(table) = table.upgrade() {
                table.entries.borrow_mut().retain(|(i, _, _)| *i != id);
            }
        })
    }

    fn dispatch(&self, event: &DomEvent) {
        // Snapshot first so handlers may add or remove listeners.
        let handlers: Vec<SharedHandler> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(event);
            }
        }
    }

    fn count(&self, kind: &EventKind) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == kind)
            .count()
    }

    fn total(&self) -> usize {
        self.entries.borrow().len()
    }
}

// ── Elements ─────────────────────────────────────────────────────────────

struct Node {
    tag: String,
    attributes: RefCell<BTreeMap<String, String>>,
    classes: RefCell<Vec<String>>,
    styles: RefCell<BTreeMap<String, String>>,
    text: RefCell<String>,
    children: RefCell<Vec<MemoryElement>>,
    parent: RefCell<Weak<Node>>,
    rect: Cell<Rect>,
    offset_top: Cell<Option<f64>>,
    scroll_left: Cell<f64>,
    scroll_width: Cell<f64>,
    client_width: Cell<f64>,
    listeners: Rc<ListenerTable>,
    document: Weak<DocumentInner>,
}

/// Element handle of the memory backend.
#[derive(Clone)]
pub struct MemoryElement(Rc<Node>);

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.0.tag)
            .field("classes", &self.0.classes.borrow())
            .finish_non_exhaustive()
    }
}

impl MemoryElement {
    fn with_document(tag: &str, document: Weak<DocumentInner>) -> Self {
        Self(Rc::new(Node {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(BTreeMap::new()),
            classes: RefCell::new(Vec::new()),
            styles: RefCell::new(BTreeMap::new()),
            text: RefCell::new(String::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            rect: Cell::new(Rect::default()),
            offset_top: Cell::new(None),
            scroll_left: Cell::new(0.0),
            scroll_width: Cell::new(0.0),
            client_width: Cell::new(0.0),
            listeners: Rc::new(ListenerTable::default()),
            document,
        }))
    }

    /// Lower-case tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Parent element, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// Create a child element and append it.
    pub fn append(&self, tag: &str) -> Self {
        let child = Self::with_document(tag, self.0.document.clone());
        self.append_child(&child);
        child
    }

    /// Set the viewport-relative box.
    pub fn set_rect(&self, rect: Rect) {
        self.0.rect.set(rect);
    }

    /// Override `offset_top`.
    pub fn set_offset_top(&self, top: f64) {
        self.0.offset_top.set(Some(top));
    }

    /// Set horizontal scroll metrics.
    pub fn set_scroll_metrics(&self, scroll_width: f64, client_width: f64) {
        self.0.scroll_width.set(scroll_width);
        self.0.client_width.set(client_width);
    }

    /// Set `scroll_left` directly (a user scroll, no event fired).
    pub fn set_scroll_left(&self, left: f64) {
        self.0.scroll_left.set(left.clamp(0.0, self.max_scroll_left()));
    }

    /// Fire `event` on this element, then bubble through its ancestors.
    pub fn dispatch(&self, event: &DomEvent) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            node.0.listeners.dispatch(event);
            current = node.parent();
        }
    }

    /// Number of listeners of `kind` attached directly to this element.
    #[must_use]
    pub fn listener_count(&self, kind: &EventKind) -> usize {
        self.0.listeners.count(kind)
    }

    /// Number of listeners of any kind attached directly to this element.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.0.listeners.total()
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(&c.0, &self.0));
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    fn clear_children(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    fn descendants(&self, out: &mut Vec<Self>) {
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            child.descendants(out);
        }
    }

    fn class_attribute(&self) -> Option<String> {
        let classes = self.0.classes.borrow();
        if classes.is_empty() {
            None
        } else {
            Some(classes.join(" "))
        }
    }
}

impl Matchable for MemoryElement {
    fn tag_name(&self) -> String {
        self.0.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        Element::get_attribute(self, name)
    }

    fn has_class(&self, class: &str) -> bool {
        Element::has_class(self, class)
    }

    fn parent_node(&self) -> Option<Self> {
        self.parent()
    }
}

fn query_all(root: &MemoryElement, selector: &str) -> Vec<MemoryElement> {
    let Some(list) = SelectorList::parse(selector) else {
        log::warn!("unsupported selector: {selector}");
        return Vec::new();
    };
    let mut all = Vec::new();
    root.descendants(&mut all);
    all.retain(|el| list.matches(el));
    all
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Element for MemoryElement {
    fn get_attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return self.class_attribute();
        }
        self.0.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if name == "class" {
            *self.0.classes.borrow_mut() =
                value.split_whitespace().map(str::to_owned).collect();
            return;
        }
        let _ = self
            .0
            .attributes
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&self, name: &str) {
        if name == "class" {
            self.0.classes.borrow_mut().clear();
            return;
        }
        let _ = self.0.attributes.borrow_mut().remove(name);
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.0.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let _ = self
            .0
            .styles
            .borrow_mut()
            .insert(property.to_owned(), value.to_owned());
    }

    fn remove_style(&self, property: &str) {
        let _ = self.0.styles.borrow_mut().remove(property);
    }

    fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    fn text_content(&self) -> String {
        let mut out = self.0.text.borrow().clone();
        for child in self.0.children.borrow().iter() {
            out.push_str(&child.text_content());
        }
        out
    }

    fn set_text_content(&self, text: &str) {
        self.clear_children();
        *self.0.text.borrow_mut() = text.to_owned();
    }

    fn inner_html(&self) -> String {
        let mut out = escape_text(&self.0.text.borrow());
        for child in self.0.children.borrow().iter() {
            out.push('<');
            out.push_str(&child.0.tag);
            if let Some(class) = child.class_attribute() {
                out.push_str(&format!(" class=\"{class}\""));
            }
            for (name, value) in child.0.attributes.borrow().iter() {
                out.push_str(&format!(" {name}=\"{value}\""));
            }
            out.push('>');
            out.push_str(&child.inner_html());
            out.push_str(&format!("</{}>", child.0.tag));
        }
        out
    }

    fn set_inner_html(&self, html: &str) {
        // No parser: markup is kept verbatim as this element's text.
        self.clear_children();
        *self.0.text.borrow_mut() = html.to_owned();
    }

    fn append_child(&self, child: &Self) {
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        query_all(self, selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        query_all(self, selector)
    }

    fn rect(&self) -> Rect {
        self.0.rect.get()
    }

    fn offset_top(&self) -> f64 {
        if let Some(top) = self.0.offset_top.get() {
            return top;
        }
        let resolver = self
            .0
            .document
            .upgrade()
            .and_then(|doc| doc.offset_resolver.borrow().clone());
        resolver.map_or(0.0, |resolve| resolve(self))
    }

    fn scroll_left(&self) -> f64 {
        self.0.scroll_left.get()
    }

    fn scroll_to_left(&self, left: f64, _smooth: bool) {
        self.set_scroll_left(left);
    }

    fn scroll_width(&self) -> f64 {
        self.0.scroll_width.get()
    }

    fn client_width(&self) -> f64 {
        self.0.client_width.get()
    }

    fn listen(&self, kind: EventKind, handler: Handler) -> Listener {
        self.0.listeners.add(kind, handler)
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ── Document ─────────────────────────────────────────────────────────────

type OffsetResolver = Rc<dyn Fn(&MemoryElement) -> f64>;

struct PendingTimer {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

struct VisibilityObserver {
    id: u64,
    element: MemoryElement,
    callback: Rc<RefCell<Box<dyn FnMut(bool)>>>,
}

struct DocumentInner {
    body: RefCell<Option<MemoryElement>>,
    window_listeners: Rc<ListenerTable>,
    document_listeners: Rc<ListenerTable>,
    timers: RefCell<Vec<PendingTimer>>,
    observers: RefCell<Vec<VisibilityObserver>>,
    next_id: Cell<u64>,
    clock: Cell<Duration>,
    scroll_y: Cell<f64>,
    viewport: Cell<(f64, f64)>,
    scroll_end: Cell<bool>,
    interactive: Cell<bool>,
    offset_resolver: RefCell<Option<OffsetResolver>>,
}

impl DocumentInner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

/// Document of the memory backend.
#[derive(Clone)]
pub struct MemoryDocument(Rc<DocumentInner>);

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("clock", &self.0.clock.get())
            .field("pending_timers", &self.0.timers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl MemoryDocument {
    /// An interactive document with an empty `<body>`, a 1280×800
    /// viewport and `scrollend` support.
    #[must_use]
    pub fn new() -> Self {
        let inner = Rc::new(DocumentInner {
            body: RefCell::new(None),
            window_listeners: Rc::new(ListenerTable::default()),
            document_listeners: Rc::new(ListenerTable::default()),
            timers: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            clock: Cell::new(Duration::ZERO),
            scroll_y: Cell::new(0.0),
            viewport: Cell::new((1280.0, 800.0)),
            scroll_end: Cell::new(true),
            interactive: Cell::new(true),
            offset_resolver: RefCell::new(None),
        });
        let body = MemoryElement::with_document("body", Rc::downgrade(&inner));
        *inner.body.borrow_mut() = Some(body);
        Self(inner)
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> MemoryElement {
        match &*self.0.body.borrow() {
            Some(body) => body.clone(),
            None => MemoryElement::with_document("body", Rc::downgrade(&self.0)),
        }
    }

    /// Create an element and append it to `<body>`.
    pub fn append_to_body(&self, tag: &str) -> MemoryElement {
        self.body().append(tag)
    }

    /// Replace the body's children, as a client-side page swap does.
    pub fn swap_body(&self) {
        self.body().clear_children();
    }

    /// Fire an event on `window`.
    pub fn dispatch_window(&self, event: &DomEvent) {
        self.0.window_listeners.dispatch(event);
    }

    /// Fire an event on `document`.
    pub fn dispatch_document(&self, event: &DomEvent) {
        self.0.document_listeners.dispatch(event);
    }

    /// Number of window listeners of `kind`.
    #[must_use]
    pub fn window_listener_count(&self, kind: &EventKind) -> usize {
        self.0.window_listeners.count(kind)
    }

    /// Number of document listeners of `kind`.
    #[must_use]
    pub fn document_listener_count(&self, kind: &EventKind) -> usize {
        self.0.document_listeners.count(kind)
    }

    /// Move the clock forward, firing every timeout that falls due in
    /// order of due time.
    pub fn advance(&self, by: Duration) {
        let target = self.0.clock.get() + by;
        loop {
            let next = {
                let mut timers = self.0.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            let Some(timer) = next else {
                break;
            };
            self.0.clock.set(timer.due.max(self.0.clock.get()));
            (timer.callback)();
        }
        self.0.clock.set(target);
    }

    /// Number of timeouts still pending.
    #[must_use]
    pub fn pending_timeouts(&self) -> usize {
        self.0.timers.borrow().len()
    }

    /// Number of live visibility observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.0.observers.borrow().len()
    }

    /// Report an intersection change for `element` to its observers.
    pub fn set_visible(&self, element: &MemoryElement, visible: bool) {
        let callbacks: Vec<_> = self
            .0
            .observers
            .borrow()
            .iter()
            .filter(|o| o.element.same_node(element))
            .map(|o| Rc::clone(&o.callback))
            .collect();
        for callback in callbacks {
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)(visible);
            }
        }
    }

    /// Set the window scroll offset (no event fired).
    pub fn set_scroll_y(&self, y: f64) {
        self.0.scroll_y.set(y);
    }

    /// Set the viewport size.
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.0.viewport.set((width, height));
    }

    /// Simulate an engine with or without `scrollend`.
    pub fn set_scroll_end_support(&self, supported: bool) {
        self.0.scroll_end.set(supported);
    }

    /// Simulate `readyState`.
    pub fn set_interactive(&self, interactive: bool) {
        self.0.interactive.set(interactive);
    }

    /// Compute `offset_top` for elements without an explicit value.
    pub fn set_offset_resolver(
        &self,
        resolver: impl Fn(&MemoryElement) -> f64 + 'static,
    ) {
        *self.0.offset_resolver.borrow_mut() = Some(Rc::new(resolver));
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn query_selector(&self, selector: &str) -> Option<MemoryElement> {
        self.body().query_selector(selector)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<MemoryElement> {
        self.body().query_selector_all(selector)
    }

    fn create_element(&self, tag: &str) -> Option<MemoryElement> {
        Some(MemoryElement::with_document(tag, Rc::downgrade(&self.0)))
    }

    fn listen_window(&self, kind: EventKind, handler: Handler) -> Listener {
        self.0.window_listeners.add(kind, handler)
    }

    fn listen_document(&self, kind: EventKind, handler: Handler) -> Listener {
        self.0.document_listeners.add(kind, handler)
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Timeout {
        let id = self.0.next_id();
        self.0.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.0.clock.get() + delay,
            callback,
        });
        let inner = Rc::downgrade(&self.0);
        Timeout::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.timers.borrow_mut().retain(|t| t.id != id);
            }
        })
    }

    fn observe_visibility(
        &self,
        element: &MemoryElement,
        _threshold: f64,
        callback: Box<dyn FnMut(bool)>,
    ) -> Listener {
        let id = self.0.next_id();
        self.0.observers.borrow_mut().push(VisibilityObserver {
            id,
            element: element.clone(),
            callback: Rc::new(RefCell::new(callback)),
        });
        let inner = Rc::downgrade(&self.0);
        Listener::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.observers.borrow_mut().retain(|o| o.id != id);
            }
        })
    }

    fn scroll_y(&self) -> f64 {
        self.0.scroll_y.get()
    }

    fn viewport(&self) -> (f64, f64) {
        self.0.viewport.get()
    }

    fn now(&self) -> Duration {
        self.0.clock.get()
    }

    fn supports_scroll_end(&self) -> bool {
        self.0.scroll_end.get()
    }

    fn is_interactive(&self) -> bool {
        self.0.interactive.get()
    }
}
