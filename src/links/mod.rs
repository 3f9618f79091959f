// src/links/mod.rs
// =============================================================================
// Everything about links before the crawler decides what to do with them.
//
// Submodules:
// - html: extracts raw href strings from a page
// - canonical: resolves hrefs to absolute URLs, strips fragments, scope test
// =============================================================================

mod canonical;
mod html;

pub use canonical::{in_scope, is_pdf_link, resolve, strip_fragment};
pub use html::extract_hrefs;
