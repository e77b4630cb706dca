//! CMS content: queries, typed documents and the fallback chains pages are
//! rendered from.
//!
//! Every fetch follows the same contract: run the query, validate the
//! result against the model, keep the raw JSON when validation fails, and
//! return `None` when the query fails or finds nothing. Nothing here ever
//! propagates an error to the page.

mod fetch;
pub mod media;
mod memory;
pub mod model;
mod query;
#[cfg(feature = "cms")]
mod sanity;

pub use fetch::{
    fetch_footer, fetch_header, fetch_page, fetch_project, fetch_projects, fetch_validated,
    ContentSource, Fetched,
};
pub use media::{Image, MediaField, SlugField};
pub use memory::MemoryContentSource;
pub use model::{FooterDoc, HeaderDoc, NavLink, Page, PageKind, Project, Seo};
pub use query::Query;
#[cfg(feature = "cms")]
pub use sanity::{endpoint, SanityClient};
