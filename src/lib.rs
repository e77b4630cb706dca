// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Test modules use unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Client-side lifecycle, i18n routing and content glue for a multilingual
//! studio website.
//!
//! Vitrina keeps per-page scripts (text reveals, sliders, tag filters,
//! pointer effects) well behaved across client-side page transitions: every
//! script is set up through one registry, tears down completely before the
//! next page swaps in, and shares state through typed keys instead of
//! window globals.
//!
//! # Key entry points
//!
//! - [`lifecycle::Runtime`] - cleanup registry, state store, script
//!   initialization and the element cache for one browser tab
//! - [`scripts::register_all`] - binds every page script to a runtime
//! - [`i18n`] - locales, the localized route table and UI strings
//! - [`content`] - CMS queries with localized fallback chains
//! - [`form`] - contact form validation and submission
//! - [`options::Options`] - site configuration (TOML, JSON Schema)
//!
//! # Architecture
//!
//! Scripts are written against the [`dom::Document`] and [`dom::Element`]
//! traits. The in-memory backend in [`dom::memory`] drives the test suite;
//! the browser backend (`dom::web`, feature `web`) wraps `web-sys`.
//! Everything runs on one thread: shared state lives in `Rc`/`RefCell`,
//! and registries never hold a borrow while calling back into user code.

pub mod content;
pub mod dom;
pub mod effects;
pub mod error;
pub mod filter;
pub mod form;
pub mod i18n;
pub mod lifecycle;
pub mod options;
pub mod redirects;
pub mod scripts;
pub mod slider;
pub mod util;
