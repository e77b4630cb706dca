//! Loosely shaped CMS fields and their normalization.
//!
//! Editors and migrations have left media fields as either a single image
//! object or a one-element array, and slugs as either a bare string or a
//! `{ "current": ... }` object. The untagged enums below accept every
//! shape; the `deserialize_with` helpers collapse them so model structs
//! only ever see `Option<Image>`, `Vec<Image>` and `String`.

use serde::{Deserialize, Deserializer, Serialize};

/// Pixel dimensions of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Width over height.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

/// Asset metadata computed by the CMS.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Base64 low-quality image placeholder.
    #[serde(default)]
    pub lqip: Option<String>,
    /// Original dimensions.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

/// A dereferenced (or still referenced) image asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Asset {
    /// Reference id when the asset was not dereferenced.
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    /// CDN URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Metadata block.
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

/// An image field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    /// The asset.
    #[serde(default)]
    pub asset: Option<Asset>,
    /// Alternative text.
    #[serde(default)]
    pub alt: Option<String>,
}

impl Image {
    /// CDN URL, if the asset was dereferenced.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.asset.as_ref()?.url.as_deref()
    }

    /// Low-quality placeholder.
    #[must_use]
    pub fn lqip(&self) -> Option<&str> {
        self.asset.as_ref()?.metadata.as_ref()?.lqip.as_deref()
    }

    /// Width over height, computed from the dimensions when the CMS did not
    /// supply it.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        let dims = self.asset.as_ref()?.metadata.as_ref()?.dimensions?;
        dims.aspect_ratio
            .or_else(|| (dims.height > 0.0).then(|| dims.width / dims.height))
    }

    /// URL resized through the image CDN's query parameters.
    #[must_use]
    pub fn sized_url(&self, width: u32) -> Option<String> {
        self.url()
            .map(|url| format!("{url}?w={width}&auto=format&fit=max"))
    }
}

/// Media as stored: one image or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MediaField {
    /// An array of images. Tried first: an image struct would also accept
    /// a sequence.
    Many(Vec<Image>),
    /// A single image object.
    One(Image),
}

impl MediaField {
    /// The first image.
    #[must_use]
    pub fn into_first(self) -> Option<Image> {
        match self {
            Self::One(image) => Some(image),
            Self::Many(images) => images.into_iter().next(),
        }
    }

    /// Every image.
    #[must_use]
    pub fn into_vec(self) -> Vec<Image> {
        match self {
            Self::One(image) => vec![image],
            Self::Many(images) => images,
        }
    }
}

/// A slug as stored: a string or `{ "current": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SlugField {
    /// Bare string.
    Plain(String),
    /// Slug object.
    Object {
        /// The slug value.
        current: String,
    },
}

impl SlugField {
    /// The slug value.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Plain(s) | Self::Object { current: s } => s,
        }
    }
}

/// `deserialize_with` for a single image that may arrive as an array.
pub fn first_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Image>, D::Error> {
    Ok(Option::<MediaField>::deserialize(deserializer)?.and_then(MediaField::into_first))
}

/// `deserialize_with` for an image list that may arrive as one object.
pub fn image_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Image>, D::Error> {
    Ok(Option::<MediaField>::deserialize(deserializer)?
        .map(MediaField::into_vec)
        .unwrap_or_default())
}

/// `deserialize_with` for a slug in either shape.
pub fn slug<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    SlugField::deserialize(deserializer).map(SlugField::into_string)
}
