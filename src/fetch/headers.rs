//! Response header capture.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

/// Flattens a response header map into one string per header name.
///
/// Every header name is kept. Repeated headers (for example two `Set-Cookie`
/// lines) are joined with `", "` in the order they were received. Names are
/// returned in canonical MIME form and values that are not valid UTF-8 are
/// decoded lossily.
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (canonical_header_name(name.as_str()), joined)
        })
        .collect()
}

/// Encodes the collected headers as the JSON string published in `headers`.
pub fn encode_headers(headers: &BTreeMap<String, String>) -> String {
    serde_json::to_string(headers).unwrap_or_else(|_| "{}".to_string())
}

/// Canonical MIME form: first letter and every letter after a hyphen upper-cased,
/// the rest lower-cased (`x-request-id` becomes `X-Request-Id`).
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn add_header(headers: &mut HeaderMap, name: &str, value: &str) {
        // In tests, we use known-good header names and values
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .unwrap_or_else(|_| panic!("Invalid header name in test: {}", name));
        let header_value = HeaderValue::from_str(value)
            .unwrap_or_else(|_| panic!("Invalid header value in test: {}", value));
        headers.append(header_name, header_value);
    }

    #[test]
    fn test_collect_headers_single_values() {
        let mut headers = HeaderMap::new();
        add_header(&mut headers, "content-type", "application/json");
        add_header(&mut headers, "x-request-id", "abc123");

        let collected = collect_headers(&headers);
        assert_eq!(collected.len(), 2);
        assert_eq!(
            collected.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(collected.get("X-Request-Id"), Some(&"abc123".to_string()));
    }

    #[test]
    fn test_collect_headers_joins_repeated_values_in_order() {
        let mut headers = HeaderMap::new();
        add_header(&mut headers, "set-cookie", "a=1; Path=/");
        add_header(&mut headers, "set-cookie", "b=2; HttpOnly");

        let collected = collect_headers(&headers);
        assert_eq!(collected.len(), 1);
        assert_eq!(
            collected.get("Set-Cookie"),
            Some(&"a=1; Path=/, b=2; HttpOnly".to_string())
        );
    }

    #[test]
    fn test_collect_headers_non_utf8_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-raw"),
            HeaderValue::from_bytes(&[b'a', 0xff]).expect("opaque bytes are allowed"),
        );
        let collected = collect_headers(&headers);
        assert_eq!(collected.get("X-Raw"), Some(&"a\u{fffd}".to_string()));
    }

    #[test]
    fn test_collect_headers_empty() {
        assert!(collect_headers(&HeaderMap::new()).is_empty());
        assert_eq!(encode_headers(&BTreeMap::new()), "{}");
    }

    #[test]
    fn test_encode_headers() {
        let mut map = BTreeMap::new();
        map.insert("Content-Type".to_string(), "text/plain".to_string());
        assert_eq!(encode_headers(&map), r#"{"Content-Type":"text/plain"}"#);
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("SET-COOKIE"), "Set-Cookie");
        assert_eq!(canonical_header_name("etag"), "Etag");
        assert_eq!(canonical_header_name("x-b3-traceid"), "X-B3-Traceid");
    }
}
