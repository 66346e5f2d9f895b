//! Fetch request parsing and URL validation.

use serde::Deserialize;

use crate::error_handling::PipelineError;

/// The decoded application payload: `{"url": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchRequest {
    /// Target URL. A missing field parses as empty and fails validation.
    #[serde(default)]
    pub url: String,
}

/// Parses decoded payload bytes into a `FetchRequest`.
///
/// # Errors
///
/// Returns `PipelineError::Parse` carrying the decoded text when the payload
/// is not a JSON object with a string `url`.
pub fn parse_request(data: &[u8]) -> Result<FetchRequest, PipelineError> {
    serde_json::from_slice(data).map_err(|source| PipelineError::Parse {
        data: String::from_utf8_lossy(data).into_owned(),
        source,
    })
}

/// Checks that the URL is fetchable.
///
/// This is a syntactic prefix check only: the URL must start with `http://` or
/// `https://`. Hosts, ports and the rest of the URL are not inspected here; a
/// URL that passes but cannot be requested fails later as a fetch error.
///
/// # Errors
///
/// Returns `PipelineError::Validation` carrying the offending URL.
pub fn validate_url(url: &str) -> Result<(), PipelineError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(PipelineError::Validation {
            url: url.to_string(),
        })
    }
}

/// Parses and validates in one step.
pub fn parse_and_validate(data: &[u8]) -> Result<FetchRequest, PipelineError> {
    let request = parse_request(data)?;
    validate_url(&request.url)?;
    Ok(request)
}
