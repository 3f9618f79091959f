// src/fetch/http.rs
// =============================================================================
// This module performs GET requests for the crawler.
//
// Key functionality:
// - One shared reqwest Client (connection pooling, common User-Agent)
// - Timeouts: 15s for a whole page request; for PDFs, 30s to get the
//   response headers and then 30s between body chunks (see download.rs),
//   so a large PDF on a slow but steady link is not cut off
// - Any non-2xx status counts as a failure, same as a network error
// - Every request goes through the retry combinator in retry.rs
//
// The caller always gets a FetchResult back, never a panic or a bare
// reqwest error. A Failure means "skip this URL".
// =============================================================================

use super::retry::{retry, RetryPolicy};
use crate::error::CrawlError;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Timeout for HTML pages
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for PDF downloads
pub const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// How a single URL should be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Applies to each attempt separately. Without streaming it bounds the
    /// whole request; with streaming only the wait for the headers.
    pub timeout: Duration,
    /// Hand the response back unread so the caller can stream it
    pub stream_body: bool,
}

impl FetchOptions {
    /// Options for an HTML page: read the whole body as text
    pub fn page() -> Self {
        Self {
            timeout: PAGE_TIMEOUT,
            stream_body: false,
        }
    }

    /// Options for a PDF: stream the body
    pub fn document() -> Self {
        Self {
            timeout: DOCUMENT_TIMEOUT,
            stream_body: true,
        }
    }
}

/// Response body, depending on FetchOptions::stream_body
#[derive(Debug)]
pub enum Body {
    Text(String),
    Stream(Response),
}

/// A successful fetch
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Body,
}

/// Outcome of a fetch after all retries
#[derive(Debug)]
pub enum FetchResult {
    Success(Fetched),
    /// Holds the error from the last attempt
    Failure(CrawlError),
}

/// GETs URLs with retries. Cheap to share by reference across the crawl.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    /// Builds the HTTP client. Fails only if the TLS backend cannot start.
    pub fn new(user_agent: &str, policy: RetryPolicy) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, policy })
    }

    // Fetches a URL, retrying failed attempts according to the policy
    //
    // Parameters:
    //   url: absolute URL to GET
    //   options: timeout and whether to hand the body back unread
    //
    // Returns: Success with the status and body, or Failure holding the
    // error from the last attempt. Every failed attempt is logged.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> FetchResult {
        let result = retry(&self.policy, url, || self.attempt(url, options)).await;

        match result {
            Ok(fetched) => FetchResult::Success(fetched),
            Err(err) => FetchResult::Failure(err),
        }
    }

    // One GET. For text bodies the read happens here too, so a body that
    // breaks off halfway is retried like any other transport failure.
    async fn attempt(&self, url: &str, options: FetchOptions) -> Result<Fetched, CrawlError> {
        let request = self.client.get(url);

        let response = if options.stream_body {
            // The caller reads the body later, so the timeout can only cover
            // connecting and waiting for the headers here
            tokio::time::timeout(options.timeout, request.send())
                .await
                .map_err(|_| CrawlError::Stalled {
                    url: url.to_string(),
                    after: options.timeout,
                })??
        } else {
            request.timeout(options.timeout).send().await?
        };

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = if options.stream_body {
            Body::Stream(response)
        } else {
            Body::Text(response.text().await?)
        };

        Ok(Fetched { status, body })
    }
}
