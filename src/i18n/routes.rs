//! Static route table and URL mapping between locales.

use super::Locale;

/// A canonical page of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    /// Landing page.
    Home,
    /// Studio / about page.
    About,
    /// Services overview.
    Services,
    /// Contact page with the form.
    Contact,
    /// Project listing.
    Projects,
    /// Legal notice.
    LegalNotice,
    /// Privacy policy.
    Privacy,
    /// Cookie policy.
    Cookies,
}

impl RouteKey {
    /// Every route in table order.
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::About,
        Self::Services,
        Self::Contact,
        Self::Projects,
        Self::LegalNotice,
        Self::Privacy,
        Self::Cookies,
    ];

    /// Per-locale paths ordered like [`Locale::ALL`].
    const fn paths(self) -> [&'static str; 3] {
        match self {
            Self::Home => ["/", "/es", "/en"],
            Self::About => ["/estudi", "/es/estudio", "/en/studio"],
            Self::Services => ["/serveis", "/es/servicios", "/en/services"],
            Self::Contact => ["/contacte", "/es/contacto", "/en/contact"],
            Self::Projects => ["/projectes", "/es/proyectos", "/en/projects"],
            Self::LegalNotice => ["/avis-legal", "/es/aviso-legal", "/en/legal-notice"],
            Self::Privacy => [
                "/politica-de-privacitat",
                "/es/politica-de-privacidad",
                "/en/privacy-policy",
            ],
            Self::Cookies => [
                "/politica-de-galetes",
                "/es/politica-de-cookies",
                "/en/cookie-policy",
            ],
        }
    }

    /// Path of this page in `locale`.
    #[must_use]
    pub const fn path(self, locale: Locale) -> &'static str {
        self.paths()[locale.index()]
    }
}

/// Path segment of project detail pages per locale.
#[must_use]
pub const fn project_segment(locale: Locale) -> &'static str {
    match locale {
        Locale::Ca => "projectes",
        Locale::Es => "proyectos",
        Locale::En => "projects",
    }
}

/// One `<link rel="alternate" hreflang>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternate {
    /// `hreflang` value (`x-default` for the fallback entry).
    pub hreflang: &'static str,
    /// Absolute URL.
    pub href: String,
}

/// Strip query, fragment and trailing slash; ensure a leading slash.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Locale a path belongs to: the first segment when it is a non-default
/// locale code, the default locale otherwise.
#[must_use]
pub fn detect_language_from_path(path: &str) -> Locale {
    let normalized = normalize(path);
    let first = normalized.trim_start_matches('/').split('/').next();
    first
        .and_then(Locale::from_code)
        .filter(|l| !l.is_default())
        .unwrap_or(Locale::DEFAULT)
}

/// The path with any locale prefix removed (`/es/proyectos` → `/proyectos`,
/// `/en` → `/`).
#[must_use]
pub fn get_base_path_without_language(path: &str) -> String {
    let normalized = normalize(path);
    let locale = detect_language_from_path(&normalized);
    if locale.is_default() {
        return normalized;
    }
    let rest = &normalized[locale.prefix().len()..];
    if rest.is_empty() {
        "/".to_owned()
    } else {
        rest.to_owned()
    }
}

/// Canonical page at `path`, if it is in the route table.
#[must_use]
pub fn route_for_path(path: &str) -> Option<(RouteKey, Locale)> {
    let normalized = normalize(path);
    let locale = detect_language_from_path(&normalized);
    RouteKey::ALL
        .into_iter()
        .find(|route| route.path(locale) == normalized)
        .map(|route| (route, locale))
}

/// Slug with a trailing `-es` / `-en` removed for non-default locales.
#[must_use]
pub fn strip_locale_suffix(slug: &str, locale: Locale) -> &str {
    if locale.is_default() {
        return slug;
    }
    let suffix = format!("-{}", locale.code());
    slug.strip_suffix(suffix.as_str()).unwrap_or(slug)
}

/// URL of a project detail page.
#[must_use]
pub fn project_url(slug: &str, locale: Locale) -> String {
    format!(
        "{}/{}/{}",
        locale.prefix(),
        project_segment(locale),
        strip_locale_suffix(slug, locale)
    )
}

/// `(locale, slug)` when `path` is a project detail page.
#[must_use]
pub fn parse_project_path(path: &str) -> Option<(Locale, String)> {
    let locale = detect_language_from_path(path);
    let base = get_base_path_without_language(path);
    let rest = base
        .strip_prefix('/')?
        .strip_prefix(project_segment(locale))?
        .strip_prefix('/')?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some((locale, rest.to_owned()))
}

/// The same page in `target`. Unknown paths map to the target's home.
#[must_use]
pub fn get_equivalent_url(path: &str, target: Locale) -> String {
    if let Some((route, _)) = route_for_path(path) {
        return route.path(target).to_owned();
    }
    if let Some((_, slug)) = parse_project_path(path) {
        return project_url(&slug, target);
    }
    log::debug!("no equivalent for '{path}', falling back to home");
    RouteKey::Home.path(target).to_owned()
}

/// Absolute canonical URL.
#[must_use]
pub fn canonical_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let path = normalize(path);
    if path == "/" {
        format!("{origin}/")
    } else {
        format!("{origin}{path}")
    }
}

/// `hreflang` alternates for `path`: one per locale plus `x-default`
/// pointing at the default locale.
#[must_use]
pub fn alternates(origin: &str, path: &str) -> Vec<Alternate> {
    let mut out: Vec<Alternate> = Locale::ALL
        .into_iter()
        .map(|locale| Alternate {
            hreflang: locale.hreflang(),
            href: canonical_url(origin, &get_equivalent_url(path, locale)),
        })
        .collect();
    out.push(Alternate {
        hreflang: "x-default",
        href: canonical_url(origin, &get_equivalent_url(path, Locale::DEFAULT)),
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_urls() {
        assert_eq!(get_equivalent_url("/projectes/my-slug", Locale::En), "/en/projects/my-slug");
        assert_eq!(get_equivalent_url("/en/services", Locale::Es), "/es/servicios");
        assert_eq!(get_equivalent_url("/es/servicios/", Locale::Ca), "/serveis");
        assert_eq!(get_equivalent_url("/", Locale::En), "/en");
        assert_eq!(get_equivalent_url("/en", Locale::Ca), "/");
        assert_eq!(get_equivalent_url("/nowhere", Locale::Es), "/es");
    }

    #[test]
    fn language_detection() {
        assert_eq!(detect_language_from_path("/en/projects/x"), Locale::En);
        assert_eq!(detect_language_from_path("/es"), Locale::Es);
        assert_eq!(detect_language_from_path("/serveis"), Locale::Ca);
        assert_eq!(detect_language_from_path("/english"), Locale::Ca);
        assert_eq!(detect_language_from_path("/ca/serveis"), Locale::Ca);
    }

    #[test]
    fn base_path() {
        assert_eq!(get_base_path_without_language("/es/proyectos"), "/proyectos");
        assert_eq!(get_base_path_without_language("/en"), "/");
        assert_eq!(get_base_path_without_language("/serveis?x=1"), "/serveis");
    }

    #[test]
    fn project_urls_strip_locale_suffix() {
        assert_eq!(project_url("casa-bosc-es", Locale::Es), "/es/proyectos/casa-bosc");
        assert_eq!(project_url("casa-bosc-en", Locale::En), "/en/projects/casa-bosc");
        assert_eq!(project_url("casa-bosc-es", Locale::En), "/en/projects/casa-bosc-es");
        assert_eq!(project_url("obra-en", Locale::Ca), "/projectes/obra-en");
        assert_eq!(
            parse_project_path("/en/projects/casa"),
            Some((Locale::En, "casa".to_owned()))
        );
        assert_eq!(parse_project_path("/en/projects"), None);
    }

    #[test]
    fn alternates_cover_every_locale() {
        let alts = alternates("https://studio.example/", "/en/contact");
        let hrefs: Vec<&str> = alts.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "https://studio.example/contacte",
                "https://studio.example/es/contacto",
                "https://studio.example/en/contact",
                "https://studio.example/contacte",
            ]
        );
        assert_eq!(alts[3].hreflang, "x-default");
    }

    #[test]
    fn every_route_path_is_detected_in_its_locale() {
        for route in RouteKey::ALL {
            for locale in Locale::ALL {
                assert_eq!(route_for_path(route.path(locale)), Some((route, locale)));
            }
        }
    }
}
