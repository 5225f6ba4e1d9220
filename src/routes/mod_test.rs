use super::test_helpers::{allow_origin, post_json, preflight, send};
use super::*;
use crate::secrets::SecretStore;
use crate::state::test_helpers::{MockUpstream, test_app_state, test_app_state_with_secrets, test_app_state_with_upstream};
use axum::body::Body;
use axum::http::{Request, header};
use serde_json::json;

#[tokio::test]
async fn healthz_ok() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let response = send(test_app_state(), request).await;
    assert_eq!(response.status, StatusCode::OK);
}

// =============================================================================
// preflight
// =============================================================================

#[tokio::test]
async fn preflight_proxy_is_empty_success_with_cors() {
    let response = send(test_app_state(), preflight("/anthropic-proxy")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert_eq!(allow_origin(&response), Some("*"));
    assert!(response.headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(response.headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
}

#[tokio::test]
async fn preflight_secret_is_empty_success_with_cors() {
    let response = send(test_app_state(), preflight("/get-secret")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert_eq!(allow_origin(&response), Some("*"));
}

#[tokio::test]
async fn preflight_never_reaches_the_upstream() {
    let upstream = MockUpstream::replying(Ok(json!({ "id": "abc" })));
    let response = send(test_app_state_with_upstream(upstream.clone()), preflight("/anthropic-proxy")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn bare_options_without_origin_still_succeeds() {
    let request = Request::builder().method("OPTIONS").uri("/get-secret").body(Body::empty()).unwrap();
    let response = send(test_app_state(), request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert_eq!(allow_origin(&response), Some("*"));
}

// =============================================================================
// CORS on every exit path
// =============================================================================

#[tokio::test]
async fn cors_header_on_success() {
    let state = test_app_state_with_secrets(SecretStore::new().with("FOO", "bar"));
    let response = send(state, post_json("/get-secret", &json!({ "secretName": "FOO" }))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(allow_origin(&response), Some("*"));
}

#[tokio::test]
async fn cors_header_on_expected_failure() {
    let response = send(test_app_state(), post_json("/get-secret", &json!({}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(allow_origin(&response), Some("*"));
}

#[tokio::test]
async fn cors_header_on_configuration_error() {
    let body = json!({ "model": "x", "messages": [], "max_tokens": 10 });
    let response = send(test_app_state(), post_json("/anthropic-proxy", &body)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(allow_origin(&response), Some("*"));
}

#[tokio::test]
async fn json_responses_declare_content_type() {
    let response = send(test_app_state(), post_json("/get-secret", &json!({ "secretName": "FOO" }))).await;
    let content_type = response.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    assert_eq!(content_type, Some("application/json"));
}
