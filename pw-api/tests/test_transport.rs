//! Transport-level tests: envelope construction, auth injection, status
//! classification, and retry behaviour against a mock HTTP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pw_api::client::{PushwooshClient, RetryConfig};
use pw_core::config::ClientConfig;
use pw_core::error::PwError;

fn fast_retries() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
        ..RetryConfig::default()
    }
}

fn client_for(server: &MockServer, api_key: Option<&str>) -> PushwooshClient {
    let config = ClientConfig::new(server.uri(), api_key.map(String::from));
    PushwooshClient::new(&config)
        .unwrap()
        .with_retry_config(fast_retries())
}

#[tokio::test]
async fn auth_is_injected_exactly_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/listTags"))
        .and(body_json(json!({"request": {"auth": "API_TOKEN"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200, "status": "OK", "response": {"tags": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("API_TOKEN"));
    let result = client.list_tags().await.unwrap();
    assert_eq!(result["status_code"], 200);
}

#[tokio::test]
async fn no_auth_field_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/listTags"))
        .and(body_json(json!({"request": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200, "status": "OK", "response": {"tags": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.list_tags().await.unwrap();
}

#[tokio::test]
async fn envelope_round_trip_preserves_values() {
    let server = MockServer::start().await;

    // Echo server: replies with whatever envelope it received.
    Mock::given(method("POST"))
        .and(path("/createFilter"))
        .respond_with(|req: &wiremock::Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            ResponseTemplate::new(200).set_body_json(body)
        })
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("K"));
    let echoed = client
        .send(
            "createFilter",
            json!({"name": "f", "count": 42, "ratio": 0.5, "flag": true, "items": [1, "two"]}),
        )
        .await
        .unwrap();

    assert_eq!(
        echoed["request"],
        json!({"name": "f", "count": 42, "ratio": 0.5, "flag": true, "items": [1, "two"], "auth": "K"})
    );
}

#[tokio::test]
async fn status_210_is_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(210).set_body_json(json!({
            "status_code": 210, "status": "Argument error", "response": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.send("getTags", json!({})).await.unwrap();
    assert_eq!(result["status_code"], 210);
}

#[tokio::test]
async fn server_error_is_retried_then_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(4) // initial try + 3 retries
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.send("listTags", json!({})).await.unwrap_err();
    match err {
        PwError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.send("listTags", json!({})).await.unwrap_err();
    assert!(matches!(err, PwError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn transient_server_error_recovers() {
    let server = MockServer::start().await;

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    Mock::given(method("POST"))
        .respond_with(move |_req: &wiremock::Request| {
            if hits_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "status_code": 200, "status": "OK", "response": {}
                }))
            }
        })
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.send("listTags", json!({})).await.unwrap();
    assert_eq!(result["status_code"], 200);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_body_on_success_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.send("listTags", json!({})).await.unwrap_err();
    assert!(matches!(err, PwError::EmptyResponse { .. }));
}

#[tokio::test]
async fn null_json_body_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.send("listTags", json!({})).await.unwrap_err();
    assert!(matches!(err, PwError::EmptyResponse { .. }));
}

#[tokio::test]
async fn embedded_business_error_is_not_raised() {
    let server = MockServer::start().await;

    // HTTP 200 carrying a service-level failure: the transport must hand the
    // envelope back untouched for the caller to interpret.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 404, "status": "Message not found", "response": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let result = client.delete_message("missing-code").await.unwrap();
    assert_eq!(result["status_code"], 404);
}

#[tokio::test]
async fn last_exchange_is_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/listFilters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200, "status": "OK", "response": {"filters": []}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("K"));
    assert!(client.last_exchange().await.is_none());

    client.list_filters().await.unwrap();

    let exchange = client.last_exchange().await.unwrap();
    assert!(exchange.url.ends_with("/listFilters"));
    assert!(exchange.request_body.contains("\"auth\":\"K\""));
    assert_eq!(exchange.status, Some(200));
    assert_eq!(exchange.response_json.unwrap()["status_code"], 200);
}
