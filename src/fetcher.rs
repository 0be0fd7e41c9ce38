//! Page fetching over HTTP.
//!
//! The scraper only needs one thing from the network: the body of a page.
//! That contract is the [`PageFetcher`] trait, so the orchestrator can be
//! driven by the real [`HttpFetcher`] or by an in-memory fetcher in tests.
//!
//! # Transport Policy
//!
//! - Browser-like user agent
//! - TLS certificate verification disabled (the source site's chain is not
//!   reliably valid)
//! - Redirects followed, up to 10 hops
//! - Fixed per-request timeout (30 seconds by default)
//!
//! Only transport failures are errors. A response with a non-2xx status is
//! still returned as a body; the extractor simply finds no rows in it.

use crate::utils::{display_url, truncate_for_log};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// User agent sent with every page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MAX_REDIRECTS: usize = 10;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch HTML from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to fetch HTML from {url}: invalid page URL ({source})")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// The page URL the failure refers to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. } | FetchError::InvalidUrl { url, .. } => url,
        }
    }
}

/// Trait for retrieving raw page bodies.
pub trait PageFetcher {
    /// Fetch `url` and return the response body text.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(url = %display_url(url)))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: display_url(url),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Page answered with a non-success status; parsing body anyway");
        }

        let body = response.text().await.map_err(request_error)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(&body, 200),
            "Fetched page"
        );
        Ok(body)
    }
}
