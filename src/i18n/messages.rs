//! Localized UI strings used by the scripts and the form.

use super::Locale;

/// A translatable UI string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Label of the reserved "all" filter pill.
    FilterAll,
    /// Contact form accepted.
    FormSuccess,
    /// Contact form rejected by the endpoint or the network.
    FormError,
    /// Contact form failed local validation.
    FormInvalid,
    /// Contact form is being sent.
    FormSending,
    /// Previous slide button label.
    SliderPrevious,
    /// Next slide button label.
    SliderNext,
}

impl Message {
    /// Text of this message in `locale`.
    #[must_use]
    pub const fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::FilterAll, Locale::Ca) => "Tots",
            (Self::FilterAll, Locale::Es) => "Todos",
            (Self::FilterAll, Locale::En) => "All",
            (Self::FormSuccess, Locale::Ca) => "Gràcies! Hem rebut el teu missatge.",
            (Self::FormSuccess, Locale::Es) => "¡Gracias! Hemos recibido tu mensaje.",
            (Self::FormSuccess, Locale::En) => "Thank you! We have received your message.",
            (Self::FormError, Locale::Ca) => {
                "No s'ha pogut enviar el missatge. Torna-ho a provar més tard."
            }
            (Self::FormError, Locale::Es) => {
                "No se ha podido enviar el mensaje. Vuelve a intentarlo más tarde."
            }
            (Self::FormError, Locale::En) => {
                "Your message could not be sent. Please try again later."
            }
            (Self::FormInvalid, Locale::Ca) => "Revisa els camps obligatoris.",
            (Self::FormInvalid, Locale::Es) => "Revisa los campos obligatorios.",
            (Self::FormInvalid, Locale::En) => "Please check the required fields.",
            (Self::FormSending, Locale::Ca) => "Enviant…",
            (Self::FormSending, Locale::Es) => "Enviando…",
            (Self::FormSending, Locale::En) => "Sending…",
            (Self::SliderPrevious, Locale::Ca) => "Anterior",
            (Self::SliderPrevious, Locale::Es) => "Anterior",
            (Self::SliderPrevious, Locale::En) => "Previous",
            (Self::SliderNext, Locale::Ca) => "Següent",
            (Self::SliderNext, Locale::Es) => "Siguiente",
            (Self::SliderNext, Locale::En) => "Next",
        }
    }
}

/// Live-region announcement after the filter set changed.
#[must_use]
pub fn filter_announcement(locale: Locale, visible: usize) -> String {
    match (locale, visible) {
        (Locale::Ca, 1) => "Es mostra 1 projecte".to_owned(),
        (Locale::Ca, n) => format!("Es mostren {n} projectes"),
        (Locale::Es, 1) => "Se muestra 1 proyecto".to_owned(),
        (Locale::Es, n) => format!("Se muestran {n} proyectos"),
        (Locale::En, 1) => "Showing 1 project".to_owned(),
        (Locale::En, n) => format!("Showing {n} projects"),
    }
}

/// Zero-padded slider position, e.g. `02 / 05`. Takes a zero-based index.
#[must_use]
pub fn slider_position(index: usize, count: usize) -> String {
    format!("{:02} / {:02}", index + 1, count)
}
