//! http_response_collector library: fetch-and-publish over Pub/Sub push
//!
//! A push subscription delivers `{"url": "..."}` requests to an HTTP endpoint.
//! Each one is decoded, validated, fetched once with a bounded timeout and body
//! size, classified as JSON or text, and published as a structured outcome to
//! a response topic (or the log, when no topic is configured).
//!
//! # Example
//!
//! ```no_run
//! use http_response_collector::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     port: 8080,
//!     ..Default::default()
//! };
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod envelope;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod outcome;
pub mod publish;
pub mod request;
pub mod server;

// Re-export public API
pub use classify::{classify_body, ResponseBody};
pub use config::{Config, LogFormat, LogLevel, PublishTarget};
pub use error_handling::{
    categorize_reqwest_error, error_chain, FetchErrorKind, InitializationError, PipelineError,
    PublishError,
};
pub use fetch::{CapturedResponse, FetchSettings, Fetcher};
pub use outcome::{FailureOutcome, FetchOutcome, SuccessOutcome};
pub use publish::{Delivery, OutcomePublisher, PubSubClient, TokenSource};
pub use server::{build_router, process_envelope, run_server, serve, AppState, Stage};
