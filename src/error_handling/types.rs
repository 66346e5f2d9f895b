//! Error type definitions.
//!
//! This module defines the pipeline, publishing and initialization errors used
//! throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::server::Stage;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Categories of outbound fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FetchErrorKind {
    /// Request exceeded the fetch timeout
    Timeout,
    /// Connection refused, DNS failure, TLS failure
    Connect,
    /// Request could not be sent
    Request,
    /// Redirect limit or loop
    Redirect,
    /// Failure while reading the response body
    Body,
    /// Response could not be decoded
    Decode,
    /// The URL could not be turned into a request
    Builder,
    /// Anything else
    Other,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchErrorKind {
    /// Returns a human-readable string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Connect => "connect error",
            FetchErrorKind::Request => "request error",
            FetchErrorKind::Redirect => "redirect error",
            FetchErrorKind::Body => "body error",
            FetchErrorKind::Decode => "decode error",
            FetchErrorKind::Builder => "invalid request",
            FetchErrorKind::Other => "other error",
        }
    }
}

/// A failure anywhere between receiving a push and having an outcome to publish.
///
/// The `Display` text is the human-readable classification that ends up in the
/// failure outcome's `error` field. [`PipelineError::subject`] is the value that
/// ends up in its `url` field: the target URL when one is known, otherwise the
/// raw input that could not be processed.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The push arrived with a method other than POST.
    #[error("Invalid request method")]
    InvalidMethod {
        /// Method the request arrived with
        method: String,
    },

    /// The inbound request body could not be read.
    #[error("Cannot read body")]
    BodyRead {
        /// Transport error text
        detail: String,
    },

    /// The push envelope is not valid JSON.
    #[error("Error unmarshalling JSON")]
    Envelope {
        /// Raw request body
        body: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// The envelope payload is not valid base64.
    #[error("Error decoding data")]
    Decode {
        /// Undecoded payload blob
        blob: String,
        /// Decoder error
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded payload is not a fetch request.
    #[error("Error unmarshalling input JSON")]
    Parse {
        /// Decoded payload text
        data: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// The requested URL does not start with `http://` or `https://`.
    #[error("Invalid URL")]
    Validation {
        /// Offending URL
        url: String,
    },

    /// The outbound GET failed at the transport level.
    #[error("Error fetching URL ({kind})")]
    Fetch {
        /// Target URL
        url: String,
        /// Failure category
        kind: FetchErrorKind,
        /// Client error
        #[source]
        source: ReqwestError,
    },

    /// The success outcome could not be serialized.
    #[error("Error marshalling output JSON")]
    Serialization {
        /// Target URL
        url: String,
        /// Serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// The diagnostic subject published alongside the error.
    pub fn subject(&self) -> &str {
        match self {
            PipelineError::InvalidMethod { .. } | PipelineError::BodyRead { .. } => "",
            PipelineError::Envelope { body, .. } => body,
            PipelineError::Decode { blob, .. } => blob,
            PipelineError::Parse { data, .. } => data,
            PipelineError::Validation { url }
            | PipelineError::Fetch { url, .. }
            | PipelineError::Serialization { url, .. } => url,
        }
    }

    /// The last stage the request reached before this error.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::InvalidMethod { .. }
            | PipelineError::BodyRead { .. }
            | PipelineError::Envelope { .. }
            | PipelineError::Decode { .. } => Stage::Received,
            PipelineError::Parse { .. } | PipelineError::Validation { .. } => Stage::Decoded,
            PipelineError::Fetch { .. } => Stage::Validated,
            PipelineError::Serialization { .. } => Stage::Classified,
        }
    }

    /// Extra context for the log line, when there is any beyond the subject.
    pub fn detail(&self) -> Option<String> {
        match self {
            PipelineError::InvalidMethod { method } => Some(method.clone()),
            PipelineError::BodyRead { detail } => Some(detail.clone()),
            _ => std::error::Error::source(self).map(error_chain),
        }
    }
}

/// Error types for outbound publishing. Terminal: logged, never retried.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The outcome could not be serialized.
    #[error("Error marshalling message for publishing: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A topic is configured without a project.
    #[error("GOOGLE_CLOUD_PROJECT env variable not set, cannot publish to PubSub")]
    MissingProject,

    /// No access token could be obtained for the Pub/Sub client.
    #[error("Error creating PubSub client: {0}")]
    Client(String),

    /// The publish call failed at the transport level.
    #[error("Error publishing message to PubSub: {0}")]
    Transport(#[from] ReqwestError),

    /// Pub/Sub answered with a non-success status.
    #[error("PubSub rejected publish with status {status}: {body}")]
    Rejected {
        /// HTTP status returned
        status: u16,
        /// Response body
        body: String,
    },

    /// Pub/Sub accepted the call but returned no message id.
    #[error("PubSub publish response contained no message id")]
    MissingMessageId,
}

/// Flattens an error and its sources into `outer: inner: root`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
