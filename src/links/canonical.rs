// src/links/canonical.rs
// =============================================================================
// Turning raw hrefs into the URL strings the crawler compares and stores.
//
// Examples (base = "https://site.example/list/?page=1"):
//   "/docs"            -> "https://site.example/docs"
//   "//cdn.example/x"  -> "https://cdn.example/x"
//   "?page=2"          -> "https://site.example/list/?page=2"
//   "?page=1?page=2"   -> "https://site.example/list/?page=2"   (repaired)
//
// Some sites build pagination links by gluing their current query string
// onto an href that already has one, which gives "?page=1?page=2". After
// resolving, if the query itself contains another '?', only the part after
// the last '?' is kept. This is a fix for that one pattern, not general
// query merging: "?a=1?b=2" becomes "?b=2" and the a=1 is lost.
// =============================================================================

use crate::error::CrawlError;
use url::Url;

// Turns an href into an absolute URL
//
// Parameters:
//   base: URL of the page the href was found on
//   href: the attribute value exactly as written
//
// Returns: the absolute URL, fragment included, with a doubled query
// repaired, or MalformedUrl if the href cannot be joined onto the base.
//
// Example:
//   base = "https://site.example/list/?page=1", href = "?page=1?page=2"
//   result = "https://site.example/list/?page=2"
pub fn resolve(base: &Url, href: &str) -> Result<String, CrawlError> {
    let mut joined = base.join(href).map_err(|source| CrawlError::MalformedUrl {
        href: href.to_string(),
        source,
    })?;

    if let Some(query) = joined.query() {
        if let Some((_, last)) = query.rsplit_once('?') {
            let repaired = last.to_string();
            if repaired.is_empty() {
                joined.set_query(None);
            } else {
                joined.set_query(Some(&repaired));
            }
        }
    }

    Ok(joined.into())
}

/// Everything before the first '#'.
pub fn strip_fragment(url: &str) -> &str {
    match url.split_once('#') {
        Some((before, _)) => before,
        None => url,
    }
}

/// Links ending in ".pdf" (any case) are downloaded instead of crawled
pub fn is_pdf_link(url: &str) -> bool {
    url.to_ascii_lowercase().ends_with(".pdf")
}

/// Whether a (fragment-stripped) URL belongs to the crawl.
///
/// This is a plain string-prefix test. It does not respect path
/// boundaries: "…/section" admits "…/section-archive". Pass a start URL
/// ending in '/' to narrow it. Both arguments are expected in normalized
/// form; the crawler normalizes its start URL before comparing.
pub fn in_scope(url: &str, start_url: &str) -> bool {
    url.starts_with(start_url)
}
