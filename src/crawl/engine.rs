// src/crawl/engine.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Start with the start URL (in normalized form) in the frontier
// 2. Pop the oldest URL; skip it if its fragment-less form was already visited
// 3. Mark it visited, wait the polite delay, fetch it (with retries)
// 4. For every href on the page:
//    - PDF link      -> download it, unless that exact URL already succeeded
//    - in-scope page -> queue it, unless visited or already queued
//    - anything else -> ignore
// 5. Repeat until the frontier is empty
//
// Every queued URL is unique and visited URLs are never forgotten, so the
// loop ends once all reachable in-scope pages have been seen.
//
// Everything runs one request at a time.
// =============================================================================

use super::download::download_pdf;
use super::queue::Frontier;
use crate::config::CrawlSettings;
use crate::fetch::{Body, FetchOptions, FetchResult, Fetched, Fetcher};
use crate::links::{extract_hrefs, in_scope, is_pdf_link, resolve, strip_fragment};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

/// What to do with one resolved link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// A PDF that has not been downloaded yet
    Download,
    /// An in-scope page that is neither visited nor queued
    Enqueue,
    /// Out of scope, already seen, or an already downloaded PDF
    Discard,
}

/// Totals reported when the crawl ends
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub start_url: String,
    /// Unique pages taken off the frontier (fetched or attempted)
    pub pages_visited: usize,
    /// Pages that failed every fetch attempt
    pub pages_failed: usize,
    /// Unique PDF URLs saved to disk
    pub pdfs_downloaded: usize,
    /// Download attempts that failed (the same URL can count more than once)
    pub downloads_failed: usize,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

/// State owned by one crawl run
#[derive(Debug)]
struct CrawlSession {
    start_url: String,
    frontier: Frontier,
    visited: HashSet<String>,
    downloaded: HashSet<String>,
    pages_failed: usize,
    downloads_failed: usize,
}

impl CrawlSession {
    fn new(start_url: &str) -> Self {
        let start_url = normalize_start_url(start_url);
        let mut frontier = Frontier::new();
        frontier.push(start_url.clone());

        Self {
            start_url,
            frontier,
            visited: HashSet::new(),
            downloaded: HashSet::new(),
            pages_failed: 0,
            downloads_failed: 0,
        }
    }

    /// Decides what happens to an absolute URL found on a page
    fn classify(&self, absolute_url: &str) -> LinkAction {
        if is_pdf_link(absolute_url) {
            return if self.downloaded.contains(absolute_url) {
                LinkAction::Discard
            } else {
                LinkAction::Download
            };
        }

        let normalized = strip_fragment(absolute_url);
        if in_scope(normalized, &self.start_url)
            && !self.visited.contains(normalized)
            && !self.frontier.contains(absolute_url)
        {
            LinkAction::Enqueue
        } else {
            LinkAction::Discard
        }
    }

    fn summary(&self, settings: &CrawlSettings) -> CrawlSummary {
        CrawlSummary {
            start_url: self.start_url.clone(),
            pages_visited: self.visited.len(),
            pages_failed: self.pages_failed,
            pdfs_downloaded: self.downloaded.len(),
            downloads_failed: self.downloads_failed,
            download_dir: settings.download_dir.clone(),
            log_file: settings.log_file.clone(),
        }
    }
}

// Links are resolved with Url::join, which lowercases the scheme and host and
// gives a bare host a "/" path. The scope prefix has to be in that same form
// or "HTTPS://Site.Example" would never match a single link.
// A start URL that does not parse is kept as-is; its fetch fails and the
// crawl ends with an empty summary.
fn normalize_start_url(start_url: &str) -> String {
    Url::parse(start_url)
        .map(String::from)
        .unwrap_or_else(|_| start_url.to_string())
}

/// Crawls from the configured start URL and downloads every PDF it finds
pub struct Crawler {
    fetcher: Fetcher,
    settings: CrawlSettings,
}

impl Crawler {
    pub fn new(fetcher: Fetcher, settings: CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    // Runs the crawl to completion
    //
    // The download directory must already exist (see prepare_download_dir).
    // Individual page or PDF failures are logged and skipped.
    //
    // Returns: the totals for the whole run. There is no error case.
    pub async fn run(&self) -> CrawlSummary {
        let mut session = CrawlSession::new(&self.settings.start_url);

        info!("Starting crawl at: {}", session.start_url);
        info!("Will only crawl pages that start with the above URL.");

        while let Some(current_url) = session.frontier.pop() {
            let normalized = strip_fragment(&current_url).to_string();
            if session.visited.contains(&normalized) {
                debug!("Already visited {}, skipping", current_url);
                continue;
            }

            info!("Crawling page: {}", current_url);
            session.visited.insert(normalized);
            tokio::time::sleep(self.settings.polite_delay).await;

            let (status, body) = match self.fetcher.fetch(&current_url, FetchOptions::page()).await {
                FetchResult::Success(Fetched { status, body }) => (status, body),
                FetchResult::Failure(_) => {
                    session.pages_failed += 1;
                    continue;
                }
            };
            debug!("Fetched {} ({})", current_url, status);

            let html = match body {
                Body::Text(text) => text,
                Body::Stream(response) => match response.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Could not read body of {}: {}", current_url, e);
                        session.pages_failed += 1;
                        continue;
                    }
                },
            };

            self.process_page(&mut session, &current_url, &html).await;
        }

        debug_assert!(session.frontier.is_empty());
        let summary = session.summary(&self.settings);
        debug!("Crawl summary: {:?}", summary);
        summary
    }

    // Step 4: look at every link on a fetched page
    //
    // Parameters:
    //   session: frontier and seen-sets, updated in place
    //   page_url: URL the page was fetched from, used as the base for hrefs
    //   html: the page body
    //
    // PDFs are downloaded right here, before the next page is fetched.
    async fn process_page(&self, session: &mut CrawlSession, page_url: &str, html: &str) {
        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot use {} as a base URL: {}", page_url, e);
                return;
            }
        };

        for href in extract_hrefs(html) {
            let absolute_url = match resolve(&base, &href) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Discarding link on {}: {}", page_url, e);
                    continue;
                }
            };

            match session.classify(&absolute_url) {
                LinkAction::Download => {
                    info!("  [+] Found PDF on '{}' -> {}", page_url, absolute_url);
                    if download_pdf(&self.fetcher, &absolute_url, &self.settings.download_dir).await {
                        session.downloaded.insert(absolute_url);
                    } else {
                        session.downloads_failed += 1;
                    }
                }
                LinkAction::Enqueue => {
                    session.frontier.push(absolute_url);
                    debug!("Queued link from {} ({} waiting)", page_url, session.frontier.len());
                }
                LinkAction::Discard => {}
            }
        }
    }
}

/// Creates the download directory (and parents) if it is missing.
/// Returns true if it had to be created.
pub async fn prepare_download_dir(dir: &std::path::Path) -> std::io::Result<bool> {
    if tokio::fs::try_exists(dir).await? {
        return Ok(false);
    }
    tokio::fs::create_dir_all(dir).await?;
    info!("Created download directory: {}", dir.display());
    Ok(true)
}
