//! Size-capped body reading.

use futures::StreamExt;

/// A response body read up to a byte limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CappedBody {
    /// Bytes kept, never more than the limit
    pub bytes: Vec<u8>,
    /// Whether bytes past the limit were discarded
    pub truncated: bool,
}

/// Streams the response body, keeping at most `max_size` bytes.
///
/// Reading stops as soon as the limit is reached; the remainder of the body is
/// not downloaded. Hitting the limit is not an error.
///
/// # Errors
///
/// Returns the client error if the stream fails before the limit is reached
/// (including the client timeout elapsing mid-body).
pub async fn read_body_with_limit(
    response: reqwest::Response,
    max_size: usize,
) -> Result<CappedBody, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut buf = Vec::with_capacity(max_size.min(16 * 1024));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = max_size - buf.len();
        if chunk.len() > remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            return Ok(CappedBody {
                bytes: buf,
                truncated: true,
            });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(CappedBody {
        bytes: buf,
        truncated: false,
    })
}
