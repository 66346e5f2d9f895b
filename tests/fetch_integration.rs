//! Integration tests for the fetcher and response classification.
//!
//! These tests run the fetcher against a local mock server and verify:
//! - Status, header and body capture
//! - JSON vs text classification of the captured body
//! - Timeout and connection failures surface as fetch errors
//! - Body truncation at the size limit

use std::time::Duration;

use http_response_collector::{
    FetchErrorKind, FetchOutcome, FetchSettings, Fetcher, PipelineError, ResponseBody,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_with(settings: FetchSettings) -> Fetcher {
    Fetcher::new(&settings).expect("Failed to build fetcher")
}

fn default_fetcher() -> Fetcher {
    fetcher_with(FetchSettings::default())
}

#[tokio::test]
async fn test_fetch_json_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"message":"Hello"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/api", mock_server.uri());
    let response = default_fetcher()
        .fetch(&url)
        .await
        .expect("fetch should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.url, url);
    assert!(!response.truncated);
    assert_eq!(
        response.headers.get("Content-Type"),
        Some(&"application/json".to_string())
    );

    match FetchOutcome::from_response(response) {
        FetchOutcome::Success(success) => {
            assert_eq!(
                success.body,
                ResponseBody::Json(r#"{"message":"Hello"}"#.to_string())
            );
            assert_eq!(success.status_code, 200);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_text_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Body Content Goes Here"))
        .mount(&mock_server)
        .await;

    let response = default_fetcher()
        .fetch(&format!("{}/page", mock_server.uri()))
        .await
        .expect("fetch should succeed");

    match FetchOutcome::from_response(response) {
        FetchOutcome::Success(success) => assert_eq!(
            success.body,
            ResponseBody::Text("Body Content Goes Here".to_string())
        ),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_error_status_is_still_a_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&mock_server)
        .await;

    let response = default_fetcher()
        .fetch(&mock_server.uri())
        .await
        .expect("HTTP error statuses are not fetch errors");
    assert_eq!(response.status, 503);
    assert_eq!(response.body, b"down for maintenance");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "http-response-collector"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = default_fetcher()
        .fetch(&mock_server.uri())
        .await
        .expect("fetch should succeed");
    assert_eq!(response.status, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_fetch_joins_repeated_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "session=abc; Path=/")
                .append_header("set-cookie", "theme=dark")
                .set_body_string("ok"),
        )
        .mount(&mock_server)
        .await;

    let response = default_fetcher()
        .fetch(&mock_server.uri())
        .await
        .expect("fetch should succeed");
    assert_eq!(
        response.headers.get("Set-Cookie"),
        Some(&"session=abc; Path=/, theme=dark".to_string())
    );
}

#[tokio::test]
async fn test_fetch_records_timing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(150))
                .set_body_string("slow"),
        )
        .mount(&mock_server)
        .await;

    let before = chrono::Utc::now();
    let response = default_fetcher()
        .fetch(&mock_server.uri())
        .await
        .expect("fetch should succeed");

    assert!(
        response.elapsed_ms >= 150,
        "elapsed {}ms should include the server delay",
        response.elapsed_ms
    );
    assert!(response.requested_at >= before);
    assert!(response.requested_at <= chrono::Utc::now());
}

#[tokio::test]
async fn test_fetch_timeout_is_a_fetch_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_string("too late"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with(FetchSettings {
        timeout: Duration::from_millis(300),
        ..Default::default()
    });
    let url = mock_server.uri();
    let err = fetcher.fetch(&url).await.expect_err("fetch should time out");

    match &err {
        PipelineError::Fetch { url: failed, kind, .. } => {
            assert_eq!(failed, &url);
            assert_eq!(*kind, FetchErrorKind::Timeout);
        }
        other => panic!("expected fetch error, got {:?}", other),
    }

    match FetchOutcome::from_error(&err) {
        FetchOutcome::Failure(failure) => {
            assert_eq!(failure.url, url);
            assert_eq!(failure.error, "Error fetching URL (timeout)");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let err = default_fetcher()
        .fetch(&format!("http://127.0.0.1:{}/", port))
        .await
        .expect_err("nothing is listening");
    assert!(matches!(
        err,
        PipelineError::Fetch {
            kind: FetchErrorKind::Connect,
            ..
        }
    ));
}

#[tokio::test]
async fn test_fetch_truncates_body_at_limit() {
    let mock_server = MockServer::start().await;
    let body = "x".repeat(100);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with(FetchSettings {
        max_body_size: 16,
        ..Default::default()
    });
    let response = fetcher
        .fetch(&mock_server.uri())
        .await
        .expect("hitting the cap is not an error");
    assert_eq!(response.body.len(), 16);
    assert!(response.truncated);
}

#[tokio::test]
async fn test_fetch_body_exactly_at_limit_is_not_truncated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789abcdef"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with(FetchSettings {
        max_body_size: 16,
        ..Default::default()
    });
    let response = fetcher.fetch(&mock_server.uri()).await.expect("fetch");
    assert_eq!(response.body, b"0123456789abcdef");
    assert!(!response.truncated);
}

#[tokio::test]
async fn test_truncated_json_is_classified_as_text() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"items":[1,2,3,4,5,6,7,8,9]}"#),
        )
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with(FetchSettings {
        max_body_size: 12,
        ..Default::default()
    });
    let response = fetcher.fetch(&mock_server.uri()).await.expect("fetch");
    match FetchOutcome::from_response(response) {
        FetchOutcome::Success(success) => {
            assert_eq!(success.body, ResponseBody::Text(r#"{"items":[1,"#.to_string()))
        }
        other => panic!("expected success, got {:?}", other),
    }
}
