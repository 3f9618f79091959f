// src/config.rs
// =============================================================================
// Settings for one crawl run.
//
// Every knob has a default equal to the values the crawler has always used,
// so `CrawlSettings::new(start_url)` is all a caller needs. The CLI
// (src/cli.rs) overrides individual fields.
// =============================================================================

use crate::fetch::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Where crawling starts when no URL is given on the command line
pub const DEFAULT_START_URL: &str = "https://www.imy.se/tillsyner/";

/// Directory PDFs are written into
pub const DEFAULT_DOWNLOAD_DIR: &str = "pdf_downloads";

/// Log file (recreated on every run)
pub const DEFAULT_LOG_FILE: &str = "crawl_log.txt";

/// Sent with every request; some sites refuse unknown clients
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// URL to start from; also the prefix that defines what is in scope
    pub start_url: String,

    /// Where downloaded PDFs go
    pub download_dir: PathBuf,

    /// Where the log is written; only reported in the summary
    pub log_file: PathBuf,

    /// Pause before every page fetch
    pub polite_delay: Duration,

    /// Attempts and backoff for every GET
    pub retry: RetryPolicy,
}

impl CrawlSettings {
    // Create settings with default values for everything but the start URL
    //
    // Example:
    //   CrawlSettings::new("https://example.com/reports/")
    //   -> PDFs into ./pdf_downloads, 500ms between pages, 3 attempts per URL
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            polite_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }
}
