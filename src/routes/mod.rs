//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two browser-facing endpoints sit behind a permissive CORS layer. The layer
//! wraps the whole router, so preflight `OPTIONS` requests are answered with
//! an empty 200 before any handler runs, and every other response, errors
//! included, carries `Access-Control-Allow-Origin: *`.

pub mod proxy;
pub mod secrets;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // The provider enforces its own payload limits.
        .route("/anthropic-proxy", post(proxy::anthropic_proxy).layer(DefaultBodyLimit::disable()))
        .route("/get-secret", post(secrets::get_secret))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use axum::body::{Body, Bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::app;
    use crate::state::AppState;

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Bytes,
    }

    impl TestResponse {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.body).expect("response body should be JSON")
        }
    }

    /// Drive one request through a fresh router.
    pub async fn send(state: AppState, request: Request<Body>) -> TestResponse {
        let response = app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, body }
    }

    /// Browser-style cross-origin `POST` with a raw body.
    pub fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::ORIGIN, "https://statements.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        post_raw(uri, body.to_string())
    }

    /// Browser preflight for a JSON `POST`.
    pub fn preflight(uri: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header(header::ORIGIN, "https://statements.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type")
            .body(Body::empty())
            .unwrap()
    }

    pub fn allow_origin(response: &TestResponse) -> Option<&str> {
        response.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
