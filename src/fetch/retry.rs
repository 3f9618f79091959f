// src/fetch/retry.rs
// =============================================================================
// A small retry combinator with exponential backoff.
//
// How it works:
// 1. Run the operation
// 2. If it fails and attempts remain, sleep backoff_base * 2^attempt
// 3. Try again, up to max_attempts times in total
// 4. Hand back the last error if every attempt failed
//
// With the defaults (3 attempts, 1 second base) a URL that never answers
// costs 1s + 2s of waiting before we give up on it. There is no sleep after
// the final attempt.
//
// Both page fetches and PDF fetches go through this function.
// =============================================================================

use crate::error::CrawlError;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Wait after the first failure; doubles after each further failure
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sleep before the attempt that follows failed attempt `attempt` (0-indexed)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    // A policy of zero attempts would never run the operation at all
    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

// Runs an operation until it succeeds or the policy's attempts run out
//
// Parameters:
//   policy: how many attempts and how long to back off
//   url: only used in log messages
//   operation: builds a fresh future for every attempt
//
// Returns: the first Ok value, or the error from the last attempt.
// Errors that are not retryable (see CrawlError::is_retryable) come back
// straight away without sleeping.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, url: &str, mut operation: F) -> Result<T, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CrawlError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        warn!("Attempt {} of {} failed for {}. Error: {}", attempt + 1, attempts, url, err);

        if !err.is_retryable() {
            return Err(err);
        }

        if attempt + 1 >= attempts {
            error!("All {} retries failed for {}. Giving up.", attempts, url);
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        info!("Retrying in {} seconds...", delay.as_secs_f64());
        tokio::time::sleep(delay).await;

        attempt += 1;
    }
}
