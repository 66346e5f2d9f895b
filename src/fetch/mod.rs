//! Outbound fetching.
//!
//! A [`Fetcher`] owns a dedicated HTTP client configured with the fetch timeout
//! and User-Agent, and turns one URL into one [`CapturedResponse`]: status,
//! flattened headers, a size-capped body and timing.

mod body;
mod headers;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::config::{FETCH_TIMEOUT, MAX_RESPONSE_BODY_SIZE, USER_AGENT};
use crate::error_handling::{categorize_reqwest_error, InitializationError, PipelineError};
use crate::initialization::init_fetch_client;

pub use body::{read_body_with_limit, CappedBody};
pub use headers::{canonical_header_name, collect_headers, encode_headers};

/// Fetch client settings.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Whole-request timeout, covering connect, headers and body
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Maximum body bytes kept
    pub max_body_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: FETCH_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            max_body_size: MAX_RESPONSE_BODY_SIZE,
        }
    }
}

/// The unclassified result of a successful fetch.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// URL as requested
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Canonical header name to joined values
    pub headers: BTreeMap<String, String>,
    /// Body bytes, at most the configured limit
    pub body: Vec<u8>,
    /// Whether the body was cut at the size limit
    pub truncated: bool,
    /// Milliseconds from dispatch until response headers arrived
    pub elapsed_ms: u64,
    /// Wall-clock time just before dispatch
    pub requested_at: DateTime<Utc>,
}

/// Issues single, bounded GET requests.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_body_size: usize,
}

impl Fetcher {
    /// Builds a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(settings: &FetchSettings) -> Result<Self, InitializationError> {
        Ok(Self {
            client: init_fetch_client(settings)?,
            max_body_size: settings.max_body_size,
        })
    }

    /// Performs one GET against `url`. No retries.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Fetch` on any transport failure (connection
    /// refused, DNS, TLS, timeout, body stream failure). No partial response is
    /// returned in that case.
    pub async fn fetch(&self, url: &str) -> Result<CapturedResponse, PipelineError> {
        let fetch_error = |source: reqwest::Error| PipelineError::Fetch {
            url: url.to_string(),
            kind: categorize_reqwest_error(&source),
            source,
        };

        let requested_at = Utc::now();
        let started = Instant::now();
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        debug!(
            "Fetched {} with status {} in {}ms ({} headers)",
            url,
            status,
            elapsed_ms,
            headers.len()
        );

        let body = read_body_with_limit(response, self.max_body_size)
            .await
            .map_err(fetch_error)?;
        if body.truncated {
            warn!(
                "Response body for {} exceeded {} bytes and was truncated",
                url, self.max_body_size
            );
        }

        Ok(CapturedResponse {
            url: url.to_string(),
            status,
            headers,
            body: body.bytes,
            truncated: body.truncated,
            elapsed_ms,
            requested_at,
        })
    }
}
