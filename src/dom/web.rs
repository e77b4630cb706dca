//! Browser backend over `web-sys`.
//!
//! Listeners own their `Closure` and remove it from the target when the
//! guard drops. Timers own theirs until cancelled or until the guard is
//! dropped after firing.

use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CustomEvent, CustomEventInit, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    MouseEvent, ScrollBehavior, ScrollToOptions,
};

use super::{Document, DomEvent, Element, EventKind, Handler, Listener, Rect, Timeout};
use crate::error::SiteError;

fn js_error(value: &JsValue) -> SiteError {
    SiteError::Web(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn log_failure<T>(what: &str, result: Result<T, JsValue>) {
    if let Err(e) = result {
        log::warn!("{what}: {}", js_error(&e));
    }
}

/// Translate a native event and run `handler`, honouring
/// `prevent_default` afterwards.
fn dispatch(kind: &EventKind, handler: &mut Handler, native: &web_sys::Event) {
    let mut event = DomEvent::new(kind.clone());
    if let Some(mouse) = native.dyn_ref::<MouseEvent>() {
        event = event.at(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
    }
    if let Some(key) = native.dyn_ref::<KeyboardEvent>() {
        event.key = Some(key.key());
    }
    handler(&event);
    if event.default_prevented() {
        native.prevent_default();
    }
}

/// Attach `handler` to `target`. Scroll and resize listeners are passive.
fn listen_on(target: &EventTarget, kind: EventKind, mut handler: Handler) -> Listener {
    let name = kind.name().to_owned();
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |native: web_sys::Event| {
        dispatch(&kind, &mut handler, &native);
    });
    let options = AddEventListenerOptions::new();
    options.set_passive(matches!(name.as_str(), "scroll" | "scrollend" | "resize"));
    if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
        &name,
        closure.as_ref().unchecked_ref(),
        &options,
    ) {
        log::warn!("could not listen for '{name}': {}", js_error(&e));
        return Listener::noop();
    }
    let target = target.clone();
    Listener::new(move || {
        log_failure(
            "remove listener",
            target.remove_event_listener_with_callback(&name, closure.as_ref().unchecked_ref()),
        );
        drop(closure);
    })
}

/// A browser element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    /// Wrap a native element.
    #[must_use]
    pub const fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    /// The native element.
    #[must_use]
    pub const fn raw(&self) -> &web_sys::Element {
        &self.0
    }

    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

fn collect(list: Result<web_sys::NodeList, JsValue>) -> Vec<WebElement> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

impl Element for WebElement {
    fn get_attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        log_failure("set attribute", self.0.set_attribute(name, value));
    }

    fn remove_attribute(&self, name: &str) {
        log_failure("remove attribute", self.0.remove_attribute(name));
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }

    fn add_class(&self, class: &str) {
        log_failure("add class", self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        log_failure("remove class", self.0.class_list().remove_1(class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(html) = self.html() {
            log_failure("set style", html.style().set_property(property, value));
        }
    }

    fn remove_style(&self, property: &str) {
        if let Some(html) = self.html() {
            log_failure("remove style", html.style().remove_property(property));
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.html()?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn append_child(&self, child: &Self) {
        log_failure("append child", self.0.append_child(&child.0));
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(Self)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        collect(self.0.query_selector_all(selector))
    }

    fn rect(&self) -> Rect {
        let r = self.0.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.width(), r.height())
    }

    fn offset_top(&self) -> f64 {
        self.html().map_or(0.0, |html| f64::from(html.offset_top()))
    }

    fn scroll_left(&self) -> f64 {
        f64::from(self.0.scroll_left())
    }

    fn scroll_to_left(&self, left: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_left(left);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        });
        self.0.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_width(&self) -> f64 {
        f64::from(self.0.scroll_width())
    }

    fn client_width(&self) -> f64 {
        f64::from(self.0.client_width())
    }

    fn listen(&self, kind: EventKind, handler: Handler) -> Listener {
        listen_on(&self.0, kind, handler)
    }

    fn same_node(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(other.0.as_ref()))
    }
}

/// The browser window and document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
    origin: web_time::Instant,
}

impl WebDocument {
    /// The current page's window and document.
    pub fn current() -> Result<Self, SiteError> {
        let window =
            web_sys::window().ok_or_else(|| SiteError::Web("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| SiteError::Web("window has no document".to_owned()))?;
        Ok(Self {
            window,
            document,
            origin: web_time::Instant::now(),
        })
    }

    /// The native window.
    #[must_use]
    pub const fn window(&self) -> &web_sys::Window {
        &self.window
    }

    /// `location.pathname`, `/` when unavailable.
    #[must_use]
    pub fn pathname(&self) -> String {
        self.window
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_owned())
    }

    /// Fire a `CustomEvent` on `document` with a string detail.
    pub fn emit(&self, name: &str, detail: Option<&str>) -> Result<(), SiteError> {
        let init = CustomEventInit::new();
        if let Some(detail) = detail {
            init.set_detail(&JsValue::from_str(detail));
        }
        let event = CustomEvent::new_with_event_init_dict(name, &init).map_err(|e| js_error(&e))?;
        let _ = self
            .document
            .dispatch_event(&event)
            .map_err(|e| js_error(&e))?;
        Ok(())
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn query_selector(&self, selector: &str) -> Option<WebElement> {
        self.document.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<WebElement> {
        collect(self.document.query_selector_all(selector))
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        self.document.create_element(tag).ok().map(WebElement)
    }

    fn listen_window(&self, kind: EventKind, handler: Handler) -> Listener {
        listen_on(&self.window, kind, handler)
    }

    fn listen_document(&self, kind: EventKind, handler: Handler) -> Listener {
        listen_on(&self.document, kind, handler)
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Timeout {
        let closure = Closure::once(move || callback());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("setTimeout failed: {}", js_error(&e));
                return Timeout::new(|| {});
            }
        };
        let window = self.window.clone();
        Timeout::new(move || {
            window.clear_timeout_with_handle(handle);
            drop(closure);
        })
    }

    fn observe_visibility(
        &self,
        element: &WebElement,
        threshold: f64,
        mut callback: Box<dyn FnMut(bool)>,
    ) -> Listener {
        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    callback(entry.is_intersecting() && entry.intersection_ratio() >= threshold);
                }
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = match IntersectionObserver::new_with_options(
            closure.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("IntersectionObserver unavailable: {}", js_error(&e));
                return Listener::noop();
            }
        };
        observer.observe(element.raw());
        Listener::new(move || {
            observer.disconnect();
            drop(closure);
        })
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport(&self) -> (f64, f64) {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        (
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn supports_scroll_end(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("onscrollend")).unwrap_or(false)
    }

    fn is_interactive(&self) -> bool {
        self.document.ready_state() != "loading"
    }
}
