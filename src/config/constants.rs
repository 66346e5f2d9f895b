//! Configuration constants.
//!
//! This module defines the fixed operational parameters of the collector:
//! fetch timeout, body size caps, identifiers and endpoint locations.

use std::time::Duration;

/// Wall-clock timeout for a single outbound fetch (connect, headers and body).
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent attached to every outbound fetch.
pub const USER_AGENT: &str = "http-response-collector";

// Response and body size limits
/// Maximum response body size in bytes (10MB)
/// Bytes past this limit are discarded; the captured body is truncated, not rejected.
pub const MAX_RESPONSE_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Maximum inbound push envelope size in bytes (16MB)
/// Pub/Sub caps messages at 10MB; base64 inflation plus envelope metadata fits under this.
pub const MAX_ENVELOPE_SIZE: usize = 16 * 1024 * 1024;

// Inbound endpoint
/// Path the push subscription delivers to.
pub const PUSH_PATH: &str = "/pubsub/push";
/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

// Outbound publishing
/// Pub/Sub REST endpoint used outside the emulator.
pub const PUBSUB_API_ENDPOINT: &str = "https://pubsub.googleapis.com";
/// Default compute metadata server host (access tokens).
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
/// Attribute key attached to every published message.
pub const PUBLISH_ATTRIBUTE_KEY: &str = "type";
/// Attribute value attached to every published message.
pub const PUBLISH_ATTRIBUTE_VALUE: &str = "request";

// Logging
/// Maximum characters of a failure subject (raw body, blob, URL) written to a log line
/// Longer subjects are truncated with a note about the original length
pub const MAX_LOG_SUBJECT_CHARS: usize = 2000;
