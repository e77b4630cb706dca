//! Contact form validation and submission.
//!
//! The form is posted URL-encoded to the static host's form endpoint,
//! which routes on the `form-name` field. A filled honeypot field marks a
//! bot: the submission is dropped but reported as sent. There is no retry;
//! the visitor sees a localized status either way.

use crate::error::SiteError;
use crate::i18n::{Locale, Message};
use crate::options::FormOptions;

/// Name of the honeypot input.
pub const HONEYPOT_FIELD: &str = "bot-field";

/// One invalid field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Name left empty.
    MissingName,
    /// E-mail left empty.
    MissingEmail,
    /// E-mail without a `local@domain.tld` shape.
    InvalidEmail,
    /// Message left empty.
    MissingMessage,
    /// Privacy consent not given.
    MissingConsent,
}

impl FieldError {
    /// Input `name` the error belongs to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::MissingName => "name",
            Self::MissingEmail | Self::InvalidEmail => "email",
            Self::MissingMessage => "message",
            Self::MissingConsent => "consent",
        }
    }
}

/// The contact form's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Visitor name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Optional phone number.
    pub phone: String,
    /// Message body.
    pub message: String,
    /// Privacy policy accepted.
    pub consent: bool,
    /// Honeypot; humans never see or fill it.
    pub bot_field: String,
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

impl ContactForm {
    /// Build from submitted `(name, value)` pairs. Unknown names are ignored.
    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "name" => form.name = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "message" => form.message = value,
                "consent" => form.consent = matches!(value.as_str(), "on" | "yes" | "true"),
                HONEYPOT_FIELD => form.bot_field = value,
                _ => {}
            }
        }
        form
    }

    /// Every invalid field, in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::MissingEmail);
        } else if !looks_like_email(email) {
            errors.push(FieldError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            errors.push(FieldError::MissingMessage);
        }
        if !self.consent {
            errors.push(FieldError::MissingConsent);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether the honeypot was filled.
    #[must_use]
    pub fn is_spam(&self) -> bool {
        !self.bot_field.trim().is_empty()
    }

    /// Pairs to URL-encode, `form-name` first.
    #[must_use]
    pub fn fields(&self, form_name: &str) -> Vec<(&'static str, String)> {
        vec![
            ("form-name", form_name.to_owned()),
            ("name", self.name.trim().to_owned()),
            ("email", self.email.trim().to_owned()),
            ("phone", self.phone.trim().to_owned()),
            ("message", self.message.trim().to_owned()),
            ("consent", if self.consent { "yes" } else { "no" }.to_owned()),
            (HONEYPOT_FIELD, self.bot_field.clone()),
        ]
    }
}

/// Posts URL-encoded pairs and reports the HTTP status.
pub trait FormTransport {
    /// POST `fields` to `endpoint`.
    fn post(&self, endpoint: &str, fields: &[(&'static str, String)]) -> Result<u16, SiteError>;
}

/// Outcome shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Accepted (or silently dropped as spam).
    Sent,
    /// Local validation failed.
    Invalid(Vec<FieldError>),
    /// The endpoint rejected the post or was unreachable.
    Failed,
}

impl FormStatus {
    /// Localized status line.
    #[must_use]
    pub fn message(&self, locale: Locale) -> &'static str {
        match self {
            Self::Sent => Message::FormSuccess.text(locale),
            Self::Invalid(_) => Message::FormInvalid.text(locale),
            Self::Failed => Message::FormError.text(locale),
        }
    }

    /// Whether the visitor should see the success state.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Interpret an endpoint response.
#[must_use]
pub fn status_from_response(response: Result<u16, SiteError>) -> FormStatus {
    match response {
        Ok(code) if (200..300).contains(&code) => FormStatus::Sent,
        Ok(code) => {
            log::warn!("contact form rejected with HTTP {code}");
            FormStatus::Failed
        }
        Err(e) => {
            log::error!("contact form not sent: {e}");
            FormStatus::Failed
        }
    }
}

/// Validate `form` and post it through `transport`.
pub fn submit(
    form: &ContactForm,
    options: &FormOptions,
    transport: &dyn FormTransport,
) -> FormStatus {
    if let Err(errors) = form.validate() {
        log::debug!("contact form invalid: {errors:?}");
        return FormStatus::Invalid(errors);
    }
    if form.is_spam() {
        log::info!("contact form honeypot filled; dropping submission");
        return FormStatus::Sent;
    }
    status_from_response(transport.post(&options.endpoint, &form.fields(&options.form_name)))
}

/// Blocking transport over `ureq`.
#[cfg(feature = "cms")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

#[cfg(feature = "cms")]
impl FormTransport for UreqTransport {
    fn post(&self, endpoint: &str, fields: &[(&'static str, String)]) -> Result<u16, SiteError> {
        match ureq::post(endpoint).send_form(fields.iter().map(|(k, v)| (*k, v.as_str()))) {
            Ok(response) => Ok(response.status().as_u16()),
            Err(ureq::Error::StatusCode(code)) => Ok(code),
            Err(e) => Err(SiteError::FormTransport(e.to_string())),
        }
    }
}

/// POST `fields` URL-encoded with the browser's `fetch`.
#[cfg(feature = "web")]
pub async fn post_form(
    endpoint: &str,
    fields: &[(&'static str, String)],
) -> Result<u16, SiteError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js = |e: wasm_bindgen::JsValue| SiteError::FormTransport(format!("{e:?}"));
    let params = web_sys::UrlSearchParams::new().map_err(js)?;
    for (name, value) in fields {
        params.append(name, value);
    }
    let headers = web_sys::Headers::new().map_err(js)?;
    headers
        .set("Content-Type", "application/x-www-form-urlencoded")
        .map_err(js)?;
    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&params.to_string().into());
    let window = web_sys::window()
        .ok_or_else(|| SiteError::FormTransport("no global window".to_owned()))?;
    let response = JsFuture::from(window.fetch_with_str_and_init(endpoint, &init))
        .await
        .map_err(js)?;
    let response: web_sys::Response = response.dyn_into().map_err(js)?;
    Ok(response.status())
}

/// [`submit`] through [`post_form`].
#[cfg(feature = "web")]
pub async fn submit_in_browser(form: &ContactForm, options: &FormOptions) -> FormStatus {
    if let Err(errors) = form.validate() {
        return FormStatus::Invalid(errors);
    }
    if form.is_spam() {
        log::info!("contact form honeypot filled; dropping submission");
        return FormStatus::Sent;
    }
    status_from_response(post_form(&options.endpoint, &form.fields(&options.form_name)).await)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Recorder {
        status: Result<u16, String>,
        posts: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl Recorder {
        fn new(status: Result<u16, String>) -> Self {
            Self {
                status,
                posts: RefCell::new(Vec::new()),
            }
        }
    }

    impl FormTransport for Recorder {
        fn post(
            &self,
            endpoint: &str,
            fields: &[(&'static str, String)],
        ) -> Result<u16, SiteError> {
            self.posts
                .borrow_mut()
                .push((endpoint.to_owned(), fields.to_vec()));
            self.status.clone().map_err(SiteError::FormTransport)
        }
    }

    fn valid() -> ContactForm {
        ContactForm {
            name: "Mar".to_owned(),
            email: "mar@example.com".to_owned(),
            message: "Hola!".to_owned(),
            consent: true,
            ..ContactForm::default()
        }
    }

    #[test]
    fn validation_reports_every_field() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::MissingName,
                FieldError::MissingEmail,
                FieldError::MissingMessage,
                FieldError::MissingConsent,
            ]
        );
        for bad in ["mar", "mar@", "@x.com", "mar@host", "mar@host.", "m ar@x.com"] {
            let form = ContactForm {
                email: bad.to_owned(),
                ..valid()
            };
            assert_eq!(form.validate(), Err(vec![FieldError::InvalidEmail]), "{bad}");
        }
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn posts_fields_with_form_name() {
        let transport = Recorder::new(Ok(200));
        let status = submit(&valid(), &FormOptions::default(), &transport);
        assert!(status.is_success());
        assert_eq!(status.message(Locale::En), "Thank you! We have received your message.");
        let posts = transport.posts.borrow();
        assert_eq!(posts[0].0, "/");
        assert_eq!(posts[0].1[0], ("form-name", "contact".to_owned()));
        assert!(posts[0].1.contains(&("consent", "yes".to_owned())));
    }

    #[test]
    fn honeypot_is_accepted_silently() {
        let transport = Recorder::new(Ok(200));
        let form = ContactForm {
            bot_field: "http://spam".to_owned(),
            ..valid()
        };
        assert_eq!(submit(&form, &FormOptions::default(), &transport), FormStatus::Sent);
        assert!(transport.posts.borrow().is_empty());
    }

    #[test]
    fn failures_become_localized_status() {
        let rejected = submit(&valid(), &FormOptions::default(), &Recorder::new(Ok(500)));
        assert_eq!(rejected, FormStatus::Failed);
        assert!(rejected.message(Locale::Ca).starts_with("No s'ha pogut"));
        let offline = submit(
            &valid(),
            &FormOptions::default(),
            &Recorder::new(Err("dns".to_owned())),
        );
        assert_eq!(offline, FormStatus::Failed);
        let invalid = submit(
            &ContactForm::default(),
            &FormOptions::default(),
            &Recorder::new(Ok(200)),
        );
        assert_eq!(invalid.message(Locale::Es), "Revisa los campos obligatorios.");
    }

    #[test]
    fn parses_submitted_pairs() {
        let form = ContactForm::from_pairs([
            ("name", "Mar"),
            ("email", "mar@example.com"),
            ("message", "Hola"),
            ("consent", "on"),
            ("utm", "ignored"),
        ]);
        assert!(form.consent);
        assert!(form.validate().is_ok());
    }
}
