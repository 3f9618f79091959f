// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling and PDF downloading.
//
// Features:
// - Breadth-first crawling starting from a URL
// - Stays under the start URL (string prefix)
// - Fragment-insensitive "already visited" tracking
// - Polite crawling with a delay before every page fetch
// - Every linked PDF downloaded once per distinct URL
//
// Submodules:
// - queue: the frontier (FIFO + membership index)
// - download: streams one PDF to disk
// - engine: the crawl loop tying it all together
// =============================================================================

mod download;
mod engine;
mod queue;

// Re-export the main crawling API
pub use engine::{prepare_download_dir, CrawlSummary, Crawler};
