// src/links/html.rs
// =============================================================================
// This module pulls raw href values out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so broken markup is fine
//
// Nothing is resolved or filtered here: the crawler needs to see every href
// exactly as written, in document order, duplicates included. Resolution
// happens in canonical.rs and de-duplication in the crawl engine.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::error;

// "a[href]" means "all <a> tags that have an href attribute"
fn anchor_selector() -> Option<&'static Selector> {
    static SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();
    SELECTOR
        .get_or_init(|| match Selector::parse("a[href]") {
            Ok(selector) => Some(selector),
            Err(e) => {
                error!("Invalid anchor selector: {:?}", e);
                None
            }
        })
        .as_ref()
}

/// Returns the href attribute of every `<a>` element, in document order.
///
/// Example:
///   html = `<a href="/docs">Docs</a><a>no href</a><a href="#top">Top</a>`
///   result = ["/docs", "#top"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let Some(selector) = anchor_selector() else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
