//! Typed CMS documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::media::{first_image, image_list, slug, Image};
use crate::i18n::Locale;

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    /// Visible label.
    pub label: String,
    /// Target path or URL.
    pub href: String,
}

/// Site header document (`header-{locale}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDoc {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Main navigation.
    #[serde(default)]
    pub navigation: Vec<NavLink>,
    /// Call-to-action button.
    #[serde(default)]
    pub cta: Option<NavLink>,
}

/// Site footer document (`footer-{locale}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterDoc {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Studio postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Social profiles.
    #[serde(default)]
    pub social: Vec<NavLink>,
    /// Legal pages.
    #[serde(default)]
    pub legal_links: Vec<NavLink>,
}

/// Search metadata of a page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    /// `<title>`.
    #[serde(default)]
    pub meta_title: Option<String>,
    /// Meta description.
    #[serde(default)]
    pub meta_description: Option<String>,
    /// Open Graph image.
    #[serde(default, deserialize_with = "first_image")]
    pub og_image: Option<Image>,
}

/// The singleton pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Landing page.
    Home,
    /// Studio page.
    About,
    /// Services page.
    Services,
    /// Contact page.
    Contact,
    /// Project listing page.
    Projects,
}

impl PageKind {
    /// Every page kind.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::About,
        Self::Services,
        Self::Contact,
        Self::Projects,
    ];

    /// CMS `_type`.
    #[must_use]
    pub const fn doc_type(self) -> &'static str {
        match self {
            Self::Home => "homePage",
            Self::About => "aboutPage",
            Self::Services => "servicesPage",
            Self::Contact => "contactPage",
            Self::Projects => "projectsPage",
        }
    }

    /// Id of this page's document in `locale` (`homePage-ca`, ...).
    #[must_use]
    pub fn document_id(self, locale: Locale) -> String {
        format!("{}-{}", self.doc_type(), locale.code())
    }

    /// Parse a CLI-style name (`home`, `about`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::Home),
            "about" => Some(Self::About),
            "services" => Some(Self::Services),
            "contact" => Some(Self::Contact),
            "projects" => Some(Self::Projects),
            _ => None,
        }
    }
}

/// A singleton page. Page-specific sections are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Heading.
    pub title: String,
    /// Hero media.
    #[serde(default, deserialize_with = "first_image")]
    pub main_image: Option<Image>,
    /// Search metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Every other field.
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

/// A project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Project name.
    pub title: String,
    /// URL slug.
    #[serde(deserialize_with = "slug")]
    pub slug: String,
    /// Document language.
    #[serde(default)]
    pub language: Option<Locale>,
    /// Completion year.
    #[serde(default)]
    pub year: Option<u16>,
    /// Town or city.
    #[serde(default)]
    pub location: Option<String>,
    /// Filter tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short description for cards.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Cover image.
    #[serde(default, deserialize_with = "first_image")]
    pub main_image: Option<Image>,
    /// Gallery.
    #[serde(default, deserialize_with = "image_list")]
    pub gallery: Vec<Image>,
    /// Search metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
}

impl Project {
    /// Public URL of this project in `locale`.
    #[must_use]
    pub fn url(&self, locale: Locale) -> String {
        crate::i18n::project_url(&self.slug, locale)
    }

    /// Value for the item's `data-tags` attribute.
    #[must_use]
    pub fn data_tags(&self) -> String {
        self.tags.join(",")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn project_normalizes_loose_fields() {
        let project: Project = serde_json::from_value(json!({
            "_id": "project-casa-bosc-en",
            "_type": "project",
            "title": "Casa Bosc",
            "slug": { "current": "casa-bosc-en" },
            "language": "en",
            "year": 2023,
            "tags": ["housing", "wood"],
            "mainImage": [{ "asset": { "url": "https://cdn/cover.jpg" } }],
            "gallery": { "asset": { "url": "https://cdn/one.jpg" } }
        }))
        .unwrap();
        assert_eq!(project.url(Locale::En), "/en/projects/casa-bosc");
        assert_eq!(project.main_image.as_ref().unwrap().url(), Some("https://cdn/cover.jpg"));
        assert_eq!(project.gallery.len(), 1);
        assert_eq!(project.data_tags(), "housing,wood");
    }

    #[test]
    fn page_keeps_unknown_sections() {
        let page: Page = serde_json::from_value(json!({
            "_id": "homePage-ca",
            "title": "Inici",
            "heroTitle": "Arquitectura",
            "seo": { "metaTitle": "Estudi" }
        }))
        .unwrap();
        assert_eq!(page.sections.get("heroTitle"), Some(&json!("Arquitectura")));
        assert_eq!(page.seo.unwrap().meta_title.as_deref(), Some("Estudi"));
        assert_eq!(PageKind::Home.document_id(Locale::Ca), "homePage-ca");
    }
}
