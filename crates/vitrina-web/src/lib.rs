//! Browser entry point.
//!
//! On module start this builds a [`Runtime`] over the live document,
//! registers every page script plus the contact form, and listens for the
//! navigation signals. Options come from a JSON `<script>` block so the
//! static build can tune them without recompiling.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vitrina::dom::web::{WebDocument, WebElement};
use vitrina::dom::{Document, Element, EventKind, Listener};
use vitrina::error::SiteError;
use vitrina::form::{submit_in_browser, ContactForm, FormStatus, HONEYPOT_FIELD};
use vitrina::i18n::{detect_language_from_path, Locale, Message};
use vitrina::lifecycle::keys::LOCALE;
use vitrina::lifecycle::{Disposer, RegisterOptions, Runtime};
use vitrina::options::{FormOptions, Options};
use vitrina::scripts::register_all;
use wasm_bindgen::prelude::*;

/// Id of the `<script type="application/json">` carrying [`Options`].
const OPTIONS_ELEMENT_ID: &str = "vitrina-options";
/// The contact form.
const FORM_SELECTOR: &str = "form[data-contact-form]";
/// Live region for the form status.
const FORM_STATUS_SELECTOR: &str = "[data-form-status]";
/// Names read from the submitted form.
const FORM_FIELDS: [&str; 6] = ["name", "email", "phone", "message", "consent", HONEYPOT_FIELD];

struct App {
    _runtime: Rc<Runtime<WebDocument>>,
    _listeners: Vec<Listener>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn read_options(document: &WebDocument) -> Options {
    let Some(text) = document
        .query_selector(&format!("#{OPTIONS_ELEMENT_ID}"))
        .map(|el| el.text_content())
        .filter(|text| !text.trim().is_empty())
    else {
        return Options::default();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("ignoring malformed page options: {e}");
        Options::default()
    })
}

fn render_status(form: &WebElement, status: &FormStatus, locale: Locale) {
    form.remove_class("is-sending");
    form.toggle_class("is-sent", status.is_success());
    form.toggle_class("has-error", !status.is_success());
    for field in FORM_FIELDS {
        if let Some(input) = form.query_selector(&format!("[name=\"{field}\"]")) {
            input.remove_attribute("aria-invalid");
        }
    }
    if let FormStatus::Invalid(errors) = status {
        for error in errors {
            if let Some(input) = form.query_selector(&format!("[name=\"{}\"]", error.field())) {
                input.set_attribute("aria-invalid", "true");
            }
        }
    }
    if let Some(region) = form.query_selector(FORM_STATUS_SELECTOR) {
        region.set_text_content(status.message(locale));
    }
}

fn read_form(form: &WebElement) -> Result<ContactForm, SiteError> {
    let native = form
        .raw()
        .dyn_ref::<web_sys::HtmlFormElement>()
        .ok_or_else(|| SiteError::Web("contact form is not a <form>".to_owned()))?;
    let data = web_sys::FormData::new_with_form(native)
        .map_err(|e| SiteError::Web(format!("{e:?}")))?;
    Ok(ContactForm::from_pairs(
        FORM_FIELDS
            .into_iter()
            .filter_map(|name| data.get(name).as_string().map(|value| (name, value))),
    ))
}

fn bind_contact_form(
    form: WebElement,
    options: FormOptions,
    runtime: &Runtime<WebDocument>,
) -> Listener {
    let state = runtime.state().clone();
    let busy = Rc::new(Cell::new(false));
    let target = form.clone();
    form.listen(
        EventKind::custom("submit"),
        Box::new(move |event| {
            event.prevent_default();
            if busy.get() {
                return;
            }
            let locale = state.get_or_default(&LOCALE, Locale::DEFAULT);
            let contact = match read_form(&target) {
                Ok(contact) => contact,
                Err(e) => {
                    log::error!("{e}");
                    render_status(&target, &FormStatus::Failed, locale);
                    return;
                }
            };
            busy.set(true);
            target.add_class("is-sending");
            if let Some(region) = target.query_selector(FORM_STATUS_SELECTOR) {
                region.set_text_content(Message::FormSending.text(locale));
            }
            let (form, options, busy) = (target.clone(), options.clone(), Rc::clone(&busy));
            wasm_bindgen_futures::spawn_local(async move {
                let status = submit_in_browser(&contact, &options).await;
                render_status(&form, &status, locale);
                busy.set(false);
            });
        }),
    )
}

fn register_site_scripts(runtime: &Rc<Runtime<WebDocument>>, options: &Options) {
    // Runs first so every later script sees the page's locale.
    let weak = Rc::downgrade(runtime);
    runtime.scripts().register_script(
        "locale",
        move || {
            if let Some(runtime) = weak.upgrade() {
                let locale = detect_language_from_path(&runtime.document().pathname());
                runtime.state().set(&LOCALE, locale);
            }
            Ok(None)
        },
        RegisterOptions::default(),
    );

    register_all(runtime, options);

    let weak = Rc::downgrade(runtime);
    let form_options = options.form.clone();
    runtime.scripts().register_script(
        "contact-form",
        move || {
            let Some(runtime) = weak.upgrade() else {
                return Ok(None);
            };
            Ok(runtime.document().query_selector(FORM_SELECTOR).map(|form| {
                Disposer::holding(bind_contact_form(form, form_options.clone(), &runtime))
            }))
        },
        RegisterOptions::default(),
    );
}

/// Module start: set up logging and bind the page.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);

    let document = WebDocument::current().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let options = read_options(&document);
    let runtime = Rc::new(Runtime::new(document));
    register_site_scripts(&runtime, &options);
    let listeners = runtime.attach();
    log::info!("vitrina attached");

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            _runtime: runtime,
            _listeners: listeners,
        });
    });
    Ok(())
}
