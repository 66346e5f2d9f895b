//! Push envelope decoding.
//!
//! Pub/Sub push delivers each message as a JSON envelope whose `message.data`
//! field holds the publisher's payload, base64-encoded.

use std::collections::HashMap;

use base64::Engine;
use serde::Deserialize;

use crate::error_handling::PipelineError;

/// The JSON body of a push delivery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEnvelope {
    /// The delivered message
    #[serde(default)]
    pub message: PushMessage,
    /// Subscription that delivered the message
    #[serde(default)]
    pub subscription: String,
}

/// A single delivered message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded payload. Missing is treated as empty.
    #[serde(default)]
    pub data: String,
    /// Publisher-supplied attributes
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Server-assigned id
    #[serde(default)]
    pub message_id: String,
    /// RFC 3339 publish timestamp
    #[serde(default)]
    pub publish_time: String,
}

/// Parses the raw push request body into an envelope.
///
/// # Errors
///
/// Returns `PipelineError::Envelope` carrying the raw body when it is not a
/// JSON envelope.
pub fn parse_envelope(body: &[u8]) -> Result<PushEnvelope, PipelineError> {
    serde_json::from_slice(body).map_err(|source| PipelineError::Envelope {
        body: String::from_utf8_lossy(body).into_owned(),
        source,
    })
}

/// Decodes the envelope's base64 payload.
///
/// # Errors
///
/// Returns `PipelineError::Decode` carrying the undecoded blob when the
/// payload is not standard, padded base64.
pub fn decode_payload(envelope: &PushEnvelope) -> Result<Vec<u8>, PipelineError> {
    let blob = &envelope.message.data;
    base64::engine::general_purpose::STANDARD
        .decode(blob)
        .map_err(|source| PipelineError::Decode {
            blob: blob.clone(),
            source,
        })
}
