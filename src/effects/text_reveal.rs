//! Line-by-line text reveal.
//!
//! Text is split into words, the words are grouped into the visual lines
//! the browser laid them out on, and each line is wrapped as
//! `span.line > span.line-inner` with a `--line-index` custom property
//! that the stylesheet uses for staggering. The reveal itself is a class
//! toggle; when it happens is decided by a [`RevealTrigger`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Document, Element, EventKind, Listener, Timeout};
use crate::error::SiteError;
use crate::lifecycle::Disposer;

/// Class that plays the reveal animation.
pub const REVEALED_CLASS: &str = "is-revealed";
/// Attribute marking an element whose lines have been built.
pub const SPLIT_ATTRIBUTE: &str = "data-reveal-split";

/// When split text is revealed.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealTrigger {
    /// Right after splitting.
    Immediate,
    /// When the named custom event fires on `document` (a preloader
    /// finishing, for instance).
    External(String),
    /// When the element scrolls into view past the given visible fraction.
    InView(f64),
}

/// Text reveal settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    /// Elements to split.
    pub selector: String,
    /// When to reveal.
    pub trigger: RevealTrigger,
    /// Max vertical distance (px) between words on the same line.
    pub line_tolerance: f64,
    /// Quiet period after a resize before lines are rebuilt.
    pub resize_debounce: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "[data-reveal]".to_owned(),
            trigger: RevealTrigger::InView(0.2),
            line_tolerance: 2.0,
            resize_debounce: Duration::from_millis(150),
        }
    }
}

/// Group word indices into lines by their `offset_top`.
///
/// A word starts a new line when it sits more than `tolerance` pixels away
/// from the first word of the current line.
#[must_use]
pub fn group_lines(tops: &[f64], tolerance: f64) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = Vec::new();
    let mut line_top = f64::NAN;
    for (i, &top) in tops.iter().enumerate() {
        match lines.last_mut() {
            Some(line) if (top - line_top).abs() <= tolerance => line.push(i),
            _ => {
                line_top = top;
                lines.push(vec![i]);
            }
        }
    }
    lines
}

struct Target<E> {
    element: E,
    original: String,
}

fn create<D: Document>(document: &D, tag: &str, class: &str) -> Result<D::Element, SiteError> {
    let element = document
        .create_element(tag)
        .ok_or_else(|| SiteError::Script(format!("cannot create <{tag}>")))?;
    element.add_class(class);
    Ok(element)
}

/// Split `element` into lines. Returns the number of lines built.
fn split<D: Document>(
    document: &D,
    element: &D::Element,
    text: &str,
    tolerance: f64,
) -> Result<usize, SiteError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(0);
    }

    // Lay the words out individually so each one can be measured.
    element.set_text_content("");
    let mut spans = Vec::with_capacity(words.len());
    for word in &words {
        let span = create(document, "span", "word")?;
        span.set_text_content(word);
        element.append_child(&span);
        spans.push(span);
    }
    let tops: Vec<f64> = spans.iter().map(Element::offset_top).collect();
    let lines = group_lines(&tops, tolerance);

    element.set_text_content("");
    for (index, line) in lines.iter().enumerate() {
        let outer = create(document, "span", "line")?;
        let inner = create(document, "span", "line-inner")?;
        inner.set_style("--line-index", &index.to_string());
        let text = line
            .iter()
            .map(|&w| words[w])
            .collect::<Vec<_>>()
            .join(" ");
        inner.set_text_content(&text);
        outer.append_child(&inner);
        element.append_child(&outer);
    }
    element.set_attribute(SPLIT_ATTRIBUTE, "");
    Ok(lines.len())
}

fn split_all<D: Document>(document: &D, targets: &[Target<D::Element>], tolerance: f64) {
    for target in targets {
        let text = plain_text(&target.original, &target.element);
        if let Err(e) = split(document, &target.element, &text, tolerance) {
            log::warn!("text reveal: {e}");
        }
    }
}

/// Text to split: the original's text content, recovered from the element
/// itself on the first pass and from the saved markup afterwards.
fn plain_text<E: Element>(original: &str, element: &E) -> String {
    if element.has_attribute(SPLIT_ATTRIBUTE) {
        element.set_inner_html(original);
    }
    element.text_content()
}

fn restore<E: Element>(target: &Target<E>) {
    target.element.set_inner_html(&target.original);
    target.element.remove_attribute(SPLIT_ATTRIBUTE);
    target.element.remove_class(REVEALED_CLASS);
}

/// Split every matching element and arm the reveal trigger.
///
/// The returned disposer detaches the trigger and restores each element's
/// original markup.
pub fn setup<D: Document>(document: &D, config: &RevealConfig) -> Result<Disposer, SiteError> {
    let targets: Vec<Target<D::Element>> = document
        .query_selector_all(&config.selector)
        .into_iter()
        .map(|element| Target {
            original: element.inner_html(),
            element,
        })
        .collect();
    if targets.is_empty() {
        log::debug!("text reveal: nothing matches '{}'", config.selector);
        return Ok(Disposer::new(|| {}));
    }
    split_all(document, &targets, config.line_tolerance);
    let targets = Rc::new(targets);

    let mut listeners: Vec<Listener> = Vec::new();
    match &config.trigger {
        RevealTrigger::Immediate => {
            for target in targets.iter() {
                target.element.add_class(REVEALED_CLASS);
            }
        }
        RevealTrigger::External(event) => {
            let targets = Rc::clone(&targets);
            listeners.push(document.listen_document(
                EventKind::custom(event),
                Box::new(move |_| {
                    for target in targets.iter() {
                        target.element.add_class(REVEALED_CLASS);
                    }
                }),
            ));
        }
        RevealTrigger::InView(threshold) => {
            for target in targets.iter() {
                let element = target.element.clone();
                listeners.push(document.observe_visibility(
                    &target.element,
                    *threshold,
                    Box::new(move |visible| {
                        if visible {
                            element.add_class(REVEALED_CLASS);
                        }
                    }),
                ));
            }
        }
    }

    // Line breaks move with the viewport width; rebuild after resizing.
    let debounce: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    {
        let document_handle = document.clone();
        let targets = Rc::clone(&targets);
        let debounce = Rc::clone(&debounce);
        let (delay, tolerance) = (config.resize_debounce, config.line_tolerance);
        listeners.push(document.listen_window(
            EventKind::Resize,
            Box::new(move |_| {
                let doc = document_handle.clone();
                let targets = Rc::clone(&targets);
                let timeout = document_handle.set_timeout(
                    delay,
                    Box::new(move || split_all(&doc, &targets, tolerance)),
                );
                *debounce.borrow_mut() = Some(timeout);
            }),
        ));
    }

    log::debug!("text reveal: split {} elements", targets.len());
    Ok(Disposer::new(move || {
        drop(listeners);
        drop(debounce.borrow_mut().take());
        for target in targets.iter() {
            restore(target);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDocument, MemoryElement};
    use crate::dom::DomEvent;

    /// Lays words out 60px wide on 200px lines, 24px tall.
    fn doc_with_layout() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.set_offset_resolver(|el: &MemoryElement| {
            let Some(parent) = el.parent() else {
                return 0.0;
            };
            let index = parent
                .children()
                .iter()
                .position(|c| c.same_node(el))
                .unwrap_or(0);
            ((index / 3) as f64) * 24.0
        });
        doc
    }

    fn heading(doc: &MemoryDocument, text: &str) -> MemoryElement {
        let h = doc.append_to_body("h2");
        h.set_attribute("data-reveal", "");
        h.set_text_content(text);
        h
    }

    fn config(trigger: RevealTrigger) -> RevealConfig {
        RevealConfig {
            trigger,
            ..RevealConfig::default()
        }
    }

    #[test]
    fn groups_by_tolerance() {
        let tops = [0.0, 0.5, 1.9, 24.0, 25.0, 48.0];
        assert_eq!(group_lines(&tops, 2.0), vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
        assert!(group_lines(&[], 2.0).is_empty());
    }

    #[test]
    fn splits_into_indexed_lines() {
        let doc = doc_with_layout();
        let h = heading(&doc, "We design quiet spaces for living and working");
        let _disposer = setup(&doc, &config(RevealTrigger::Immediate));
        let lines = h.query_selector_all(".line");
        assert_eq!(lines.len(), 3);
        let inners = h.query_selector_all(".line .line-inner");
        let texts: Vec<String> = inners.iter().map(Element::text_content).collect();
        assert_eq!(texts, vec!["We design quiet", "spaces for living", "and working"]);
        assert_eq!(inners[2].style("--line-index").as_deref(), Some("2"));
        assert!(h.has_class(REVEALED_CLASS));
    }

    #[test]
    fn teardown_restores_original() {
        let doc = doc_with_layout();
        let h = heading(&doc, "Architecture and interiors");
        let before = h.inner_html();
        let disposer = setup(&doc, &config(RevealTrigger::Immediate));
        assert!(h.has_attribute(SPLIT_ATTRIBUTE));
        assert!(disposer.and_then(Disposer::dispose).is_ok());
        assert_eq!(h.inner_html(), before);
        assert!(!h.has_class(REVEALED_CLASS));
        assert!(!h.has_attribute(SPLIT_ATTRIBUTE));
        assert_eq!(doc.window_listener_count(&EventKind::Resize), 0);
    }

    #[test]
    fn external_trigger_waits_for_event() {
        let doc = doc_with_layout();
        let h = heading(&doc, "Hello there");
        let _disposer = setup(&doc, &config(RevealTrigger::External("preloader:done".into())));
        assert!(!h.has_class(REVEALED_CLASS));
        doc.dispatch_document(&DomEvent::new(EventKind::custom("preloader:done")));
        assert!(h.has_class(REVEALED_CLASS));
    }

    #[test]
    fn in_view_trigger_reveals_on_intersection() {
        let doc = doc_with_layout();
        let h = heading(&doc, "Hello there");
        let disposer = setup(&doc, &config(RevealTrigger::InView(0.2)));
        assert_eq!(doc.observer_count(), 1);
        doc.set_visible(&h, false);
        assert!(!h.has_class(REVEALED_CLASS));
        doc.set_visible(&h, true);
        assert!(h.has_class(REVEALED_CLASS));
        drop(disposer);
        assert_eq!(doc.observer_count(), 0);
    }

    #[test]
    fn resize_rebuilds_after_debounce() {
        let doc = doc_with_layout();
        let h = heading(&doc, "one two three four");
        let _disposer = setup(&doc, &config(RevealTrigger::Immediate));
        assert_eq!(h.query_selector_all(".line").len(), 2);
        doc.set_offset_resolver(|_: &MemoryElement| 0.0);
        doc.dispatch_window(&DomEvent::new(EventKind::Resize));
        doc.advance(Duration::from_millis(100));
        doc.dispatch_window(&DomEvent::new(EventKind::Resize));
        doc.advance(Duration::from_millis(149));
        assert_eq!(h.query_selector_all(".line").len(), 2);
        doc.advance(Duration::from_millis(1));
        let lines = h.query_selector_all(".line");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text_content(), "one two three four");
        assert!(h.has_class(REVEALED_CLASS));
    }
}
