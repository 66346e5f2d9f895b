//! HTTP client initialization.
//!
//! The fetch and publish paths each get their own `reqwest::Client` so their
//! timeout policies stay independent.

use reqwest::ClientBuilder;

use crate::fetch::FetchSettings;

/// Initializes the HTTP client used for outbound fetches.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from settings
/// - Whole-request timeout from settings (connect, headers and body)
/// - Default redirect following (up to 10 hops)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_fetch_client(settings: &FetchSettings) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.clone())
        .build()
}

/// Initializes the HTTP client used to talk to Pub/Sub and the metadata server.
///
/// No timeout is configured; calls inherit the client's defaults.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_publish_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .user_agent(crate::config::USER_AGENT)
        .build()
}
