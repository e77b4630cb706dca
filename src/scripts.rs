//! The site's page scripts, registered with a [`Runtime`].
//!
//! Each script binds whatever its markup hook finds in the current page
//! and hands back a disposer. Registration goes through
//! [`InitManager::register_script`](crate::lifecycle::InitManager::register_script),
//! so every script starts once the DOM is interactive and is rebuilt after
//! each client-side navigation.

use std::rc::Rc;

use crate::dom::{Document, Element};
use crate::effects::{drag_scroll, header, horizontal_scroll, magnetic, text_reveal};
use crate::error::SiteError;
use crate::filter::{AllMatch, AnyMatch, FilterBehavior, FilterSelectors, FilterWidget};
use crate::i18n::Locale;
use crate::lifecycle::keys::LOCALE;
use crate::lifecycle::{Disposer, RegisterOptions, Runtime};
use crate::options::Options;
use crate::slider::Slider;

/// Script names, in registration order.
pub const SCRIPTS: [&str; 7] = [
    HEADER,
    TEXT_REVEAL,
    MAGNETIC,
    HORIZONTAL_SCROLL,
    DRAG_SCROLL,
    FILTERS,
    SLIDERS,
];

/// Sticky header and mobile menu.
pub const HEADER: &str = "header";
/// Line-by-line text reveal.
pub const TEXT_REVEAL: &str = "text-reveal";
/// Magnetic pointer effect.
pub const MAGNETIC: &str = "magnetic";
/// Scroll-driven horizontal track.
pub const HORIZONTAL_SCROLL: &str = "horizontal-scroll";
/// Pointer drag on overflowing rows.
pub const DRAG_SCROLL: &str = "drag-scroll";
/// Project tag filters.
pub const FILTERS: &str = "filters";
/// Project sliders.
pub const SLIDERS: &str = "sliders";

/// Root of one filterable grid. `data-filter-mode="all"` switches it to
/// all-tags matching.
pub const FILTER_ROOT_SELECTOR: &str = "[data-filter-root]";
/// Root of one slider.
pub const SLIDER_ROOT_SELECTOR: &str = "[data-slider]";

/// Register a script whose setup needs the runtime. The closure holds the
/// runtime weakly and does nothing once it is gone.
fn register<D: Document>(
    runtime: &Rc<Runtime<D>>,
    name: &str,
    init: impl Fn(&Runtime<D>) -> Result<Option<Disposer>, SiteError> + 'static,
) {
    let weak = Rc::downgrade(runtime);
    runtime.scripts().register_script(
        name,
        move || weak.upgrade().map_or(Ok(None), |runtime| init(&runtime)),
        RegisterOptions::default(),
    );
}

/// Locale of the current page, as published under [`LOCALE`].
fn page_locale<D: Document>(runtime: &Runtime<D>) -> Locale {
    runtime.state().get_or_default(&LOCALE, Locale::DEFAULT)
}

fn filter_behavior<E: Element>(root: &E) -> Box<dyn FilterBehavior> {
    match root.get_attribute("data-filter-mode").as_deref() {
        Some("all") => Box::new(AllMatch),
        _ => Box::new(AnyMatch),
    }
}

/// Register every page script with settings from `options`.
pub fn register_all<D: Document>(runtime: &Rc<Runtime<D>>, options: &Options) {
    let threshold = options.effects.header_scroll_threshold;
    register(runtime, HEADER, move |rt| {
        Ok(Some(header::setup(rt.document(), rt.cache(), threshold)))
    });

    let reveal = options.reveal.config();
    register(runtime, TEXT_REVEAL, move |rt| {
        text_reveal::setup(rt.document(), &reveal).map(Some)
    });

    let magnetic = options.effects.magnetic();
    register(runtime, MAGNETIC, move |rt| {
        Ok(Some(magnetic::setup(rt.document(), &magnetic)))
    });

    register(runtime, HORIZONTAL_SCROLL, |rt| {
        Ok(horizontal_scroll::setup(rt.document(), rt.cache()))
    });

    let drag = options.effects.drag_scroll();
    register(runtime, DRAG_SCROLL, move |rt| {
        Ok(Some(drag_scroll::setup(rt.document(), rt.state(), &drag)))
    });

    register(runtime, FILTERS, |rt| {
        let locale = page_locale(rt);
        let widgets: Vec<FilterWidget<D::Element>> = rt
            .document()
            .query_selector_all(FILTER_ROOT_SELECTOR)
            .iter()
            .map(|root| {
                FilterWidget::setup(
                    root,
                    &FilterSelectors::default(),
                    filter_behavior(root),
                    rt.state().clone(),
                    locale,
                )
            })
            .collect();
        log::debug!("{} filter widget(s) bound", widgets.len());
        Ok((!widgets.is_empty()).then(|| Disposer::holding(widgets)))
    });

    let slider = options.slider.config();
    register(runtime, SLIDERS, move |rt| {
        let sliders: Vec<Slider<D>> = rt
            .document()
            .query_selector_all(SLIDER_ROOT_SELECTOR)
            .iter()
            .map(|root| Slider::setup(rt.document(), root, slider.clone(), rt.state().clone()))
            .collect();
        log::debug!("{} slider(s) bound", sliders.len());
        Ok((!sliders.is_empty()).then(|| Disposer::holding(sliders)))
    });
}
