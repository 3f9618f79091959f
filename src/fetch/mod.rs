// src/fetch/mod.rs
// =============================================================================
// HTTP fetching with bounded retries.
//
// Submodules:
// - retry: generic retry-with-exponential-backoff combinator
// - http: the Fetcher that wraps reqwest and uses the combinator
// =============================================================================

mod http;
mod retry;

pub use http::{Body, FetchOptions, FetchResult, Fetched, Fetcher};
pub use retry::RetryPolicy;
