// src/error.rs
// =============================================================================
// Everything that can go wrong while crawling, in one enum.
//
// The crawl never aborts because of one of these. Each variant maps to a
// single recovery action:
// - Transport / HttpStatus / Stalled: retried, then the URL is skipped
// - FileSystem: the one download fails, the crawl carries on
// - MalformedUrl: the one href is discarded
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets `?` convert a reqwest::Error into CrawlError automatically
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Timeouts, refused connections, DNS failures, broken bodies
    #[error("{}: {}", describe_transport(.0), .0)]
    Transport(#[from] reqwest::Error),

    /// Nothing arrived from the server within the allowed time, either
    /// while waiting for the response headers or between two body chunks
    #[error("no data from {} for {:.1} seconds", .url, .after.as_secs_f64())]
    Stalled { url: String, after: Duration },

    /// The server answered, but not with a 2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Writing a downloaded file failed
    #[error("cannot write {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An href that cannot be resolved against its page
    #[error("cannot resolve '{href}': {source}")]
    MalformedUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

impl CrawlError {
    /// True for the failures the retrying fetcher should try again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlError::Transport(_) | CrawlError::HttpStatus { .. } | CrawlError::Stalled { .. }
        )
    }
}

// Short human label for a reqwest failure, used as the message prefix.
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Connection refused
// - Body stream interrupted
fn describe_transport(error: &reqwest::Error) -> &'static str {
    let text = error.to_string().to_lowercase();

    if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() && text.contains("dns") {
        "could not resolve hostname"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_body() || error.is_decode() {
        "response body failed"
    } else {
        "request failed"
    }
}
