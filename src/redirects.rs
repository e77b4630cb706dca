//! Permanent redirects from the previous site's URLs.
//!
//! The old site lived on a blog engine with its own slugs; search engines
//! and printed material still point at them. Fixed paths map to a route of
//! the current table, `/blog/*` lands on the home page and
//! `/portfolio-item/{slug}` on the matching project.

use std::fmt::Write as _;

use crate::i18n::{project_url, Locale, RouteKey};

/// HTTP status used for every legacy redirect.
pub const STATUS: u16 = 301;

/// Fixed legacy paths, trailing slash stripped, with their new route.
const LEGACY: [(&str, RouteKey, Locale); 26] = [
    ("/index.php", RouteKey::Home, Locale::Ca),
    ("/inici", RouteKey::Home, Locale::Ca),
    ("/home", RouteKey::Home, Locale::En),
    ("/qui-som", RouteKey::About, Locale::Ca),
    ("/nosaltres", RouteKey::About, Locale::Ca),
    ("/es/quienes-somos", RouteKey::About, Locale::Es),
    ("/es/nosotros", RouteKey::About, Locale::Es),
    ("/en/about-us", RouteKey::About, Locale::En),
    ("/en/about", RouteKey::About, Locale::En),
    ("/que-fem", RouteKey::Services, Locale::Ca),
    ("/es/que-hacemos", RouteKey::Services, Locale::Es),
    ("/en/what-we-do", RouteKey::Services, Locale::En),
    ("/contacta", RouteKey::Contact, Locale::Ca),
    ("/contacte-2", RouteKey::Contact, Locale::Ca),
    ("/es/contacta", RouteKey::Contact, Locale::Es),
    ("/en/contact-us", RouteKey::Contact, Locale::En),
    ("/portfoli", RouteKey::Projects, Locale::Ca),
    ("/portfolio", RouteKey::Projects, Locale::Ca),
    ("/obres", RouteKey::Projects, Locale::Ca),
    ("/es/portfolio", RouteKey::Projects, Locale::Es),
    ("/es/obras", RouteKey::Projects, Locale::Es),
    ("/en/portfolio", RouteKey::Projects, Locale::En),
    ("/en/works", RouteKey::Projects, Locale::En),
    ("/avis-legal-2", RouteKey::LegalNotice, Locale::Ca),
    ("/politica-de-privacitat-2", RouteKey::Privacy, Locale::Ca),
    ("/politica-de-cookies", RouteKey::Cookies, Locale::Ca),
];

/// Prefix for old blog posts; the blog no longer exists.
const BLOG_PREFIX: &str = "/blog/";
/// Prefix for old project pages.
const PORTFOLIO_PREFIX: &str = "/portfolio-item/";

/// A resolved redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// New location.
    pub location: String,
    /// HTTP status.
    pub status: u16,
}

impl Redirect {
    fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: STATUS,
        }
    }
}

/// Redirect for a request path, if it is a legacy URL.
///
/// Matching ignores a trailing slash and ASCII case.
#[must_use]
pub fn resolve(path: &str) -> Option<Redirect> {
    let lowered = path.to_ascii_lowercase();
    let trimmed = match lowered.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    if let Some((_, key, locale)) = LEGACY.iter().find(|(from, ..)| *from == trimmed) {
        return Some(Redirect::to(key.path(*locale)));
    }
    if trimmed == BLOG_PREFIX.trim_end_matches('/') || trimmed.starts_with(BLOG_PREFIX) {
        return Some(Redirect::to(RouteKey::Home.path(Locale::DEFAULT)));
    }
    if let Some(rest) = trimmed.strip_prefix(PORTFOLIO_PREFIX.trim_end_matches('/')) {
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        let slug = rest.trim_start_matches('/').split('/').next().unwrap_or_default();
        let location = if slug.is_empty() {
            RouteKey::Projects.path(Locale::DEFAULT).to_owned()
        } else {
            project_url(slug, Locale::DEFAULT)
        };
        return Some(Redirect::to(location));
    }
    None
}

/// The redirect table in static-host `_redirects` syntax.
///
/// Fixed paths come first, each also with a trailing slash; the prefix
/// rules follow as splats.
#[must_use]
pub fn render_redirects_file() -> String {
    let mut out = String::from("# Legacy URLs\n");
    for (from, key, locale) in &LEGACY {
        let to = key.path(*locale);
        let _ = writeln!(out, "{from}  {to}  {STATUS}");
        let _ = writeln!(out, "{from}/  {to}  {STATUS}");
    }
    let _ = writeln!(out, "{BLOG_PREFIX}*  {}  {STATUS}", RouteKey::Home.path(Locale::DEFAULT));
    let _ = writeln!(
        out,
        "{PORTFOLIO_PREFIX}:slug  {}/:slug  {STATUS}",
        RouteKey::Projects.path(Locale::DEFAULT)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_paths_redirect_permanently() {
        let r = resolve("/qui-som/").unwrap();
        assert_eq!(r.location, "/estudi");
        assert_eq!(r.status, 301);
        assert_eq!(resolve("/EN/Works").unwrap().location, "/en/projects");
        assert_eq!(resolve("/index.php").unwrap().location, "/");
    }

    #[test]
    fn prefixes_redirect() {
        assert_eq!(resolve("/blog/2019/obertura").unwrap().location, "/");
        assert_eq!(resolve("/blog").unwrap().location, "/");
        assert_eq!(
            resolve("/portfolio-item/casa-bosc/").unwrap().location,
            "/projectes/casa-bosc"
        );
        assert_eq!(resolve("/portfolio-item/").unwrap().location, "/projectes");
    }

    #[test]
    fn current_routes_are_not_redirected() {
        for key in RouteKey::ALL {
            for locale in Locale::ALL {
                assert_eq!(resolve(key.path(locale)), None, "{key:?} {locale}");
            }
        }
        assert_eq!(resolve("/projectes/casa-bosc"), None);
        assert_eq!(resolve("/blogger"), None);
        assert_eq!(resolve("/portfolio-items"), None);
    }

    #[test]
    fn redirects_file_lists_every_rule() {
        let file = render_redirects_file();
        assert!(file.contains("/qui-som  /estudi  301\n"));
        assert!(file.contains("/qui-som/  /estudi  301\n"));
        assert!(file.contains("/blog/*  /  301\n"));
        assert!(file.contains("/portfolio-item/:slug  /projectes/:slug  301\n"));
        assert_eq!(file.lines().count(), 1 + LEGACY.len() * 2 + 2);
    }
}
