//! Response body classification.

use serde::de::IgnoredAny;
use serde::Serialize;

/// The captured body, in exactly one of its two published representations.
///
/// Serializes as a single map entry, `responseJson` or `responseBody`, so the
/// field that does not apply is absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResponseBody {
    /// The body is a valid JSON document, kept byte-for-byte.
    #[serde(rename = "responseJson")]
    Json(String),
    /// Anything else, decoded as UTF-8 with invalid sequences replaced.
    #[serde(rename = "responseBody")]
    Text(String),
}

impl ResponseBody {
    /// The body text, whichever representation it is in.
    pub fn as_str(&self) -> &str {
        match self {
            ResponseBody::Json(s) | ResponseBody::Text(s) => s,
        }
    }

    /// Whether the body parsed as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }
}

/// Classifies raw body bytes.
///
/// Any valid JSON value counts, not only objects. Surrounding whitespace is
/// allowed, trailing garbage is not. The original bytes are kept; the body is
/// never re-serialized. Invalid UTF-8 inside JSON strings does not disqualify
/// a body; such bytes are replaced with U+FFFD like any other body.
pub fn classify_body(body: &[u8]) -> ResponseBody {
    let text = String::from_utf8_lossy(body).into_owned();
    if serde_json::from_slice::<IgnoredAny>(body).is_ok() {
        ResponseBody::Json(text)
    } else {
        ResponseBody::Text(text)
    }
}
