//! Fetch outcomes and their published JSON form.
//!
//! An outcome is either a success (the target answered, whatever the status
//! code) or a failure (the pipeline could not produce a response). The two
//! shapes share no optional fields, so a mixed outcome cannot be built.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::classify::{classify_body, ResponseBody};
use crate::error_handling::PipelineError;
use crate::fetch::{encode_headers, CapturedResponse};

/// The result of handling one push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    /// The target answered
    Success(SuccessOutcome),
    /// No response was captured
    Failure(FailureOutcome),
}

/// A response was received from the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessOutcome {
    /// URL as requested
    pub url: String,
    /// JSON-encoded map of header name to joined values
    pub headers: String,
    /// Exactly one of `responseJson` / `responseBody`
    #[serde(flatten)]
    pub body: ResponseBody,
    /// Milliseconds until response headers arrived
    pub response_time: u64,
    /// Wall-clock time just before dispatch
    #[serde(serialize_with = "serialize_rfc3339_nanos")]
    pub request_time: DateTime<Utc>,
    /// HTTP status code, whatever its class
    pub status_code: u16,
}

/// The pipeline stopped before a response could be captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureOutcome {
    /// Target URL when known, otherwise the raw input that failed (may be empty)
    pub url: String,
    /// Human-readable failure classification
    pub error: String,
    /// When the failure was recorded
    #[serde(serialize_with = "serialize_rfc3339_nanos")]
    pub request_time: DateTime<Utc>,
}

impl FetchOutcome {
    /// Classifies a captured response into a success outcome.
    pub fn from_response(response: CapturedResponse) -> Self {
        FetchOutcome::Success(SuccessOutcome {
            body: classify_body(&response.body),
            headers: encode_headers(&response.headers),
            url: response.url,
            response_time: response.elapsed_ms,
            request_time: response.requested_at,
            status_code: response.status,
        })
    }

    /// Builds the failure outcome for a pipeline error, stamped now.
    pub fn from_error(error: &PipelineError) -> Self {
        FetchOutcome::Failure(FailureOutcome {
            url: error.subject().to_string(),
            error: error.to_string(),
            request_time: Utc::now(),
        })
    }

    /// The `url` field of either shape.
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Success(s) => &s.url,
            FetchOutcome::Failure(f) => &f.url,
        }
    }

    /// Whether a response was captured.
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Canonical JSON form, as published.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for well-formed outcomes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn serialize_rfc3339_nanos<S: Serializer>(
    time: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Nanos, true))
}
