//! HTTP-facing error taxonomy.
//!
//! Every failure leaves a handler as an `ApiError`, which renders a JSON body
//! and a status code. CORS headers are added by the router-wide layer, so
//! error responses carry them too.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::llm::UpstreamError;
use crate::secrets::SecretError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A credential the endpoint needs is not configured.
    #[error("{0}")]
    Configuration(String),

    /// `secretName` was absent or empty.
    #[error("Secret name is required")]
    MissingParameter,

    #[error("Secret {0} not found")]
    NotFound(String),

    /// The AI provider rejected the call. `body` is JSON, relayed unchanged.
    #[error("upstream responded with status {status}")]
    Upstream { status: u16, body: Bytes },

    /// The upstream call failed before a usable response arrived.
    #[error("{0}")]
    Transport(String),

    /// The request body could not be read as JSON.
    #[error("{0}")]
    InvalidBody(String),
}

/// Map an error to its response status.
///
/// Upstream statuses outside the valid HTTP range fall back to 502.
#[must_use]
pub fn api_error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::MissingParameter => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::Upstream { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
        ApiError::Configuration(_) | ApiError::Transport(_) | ApiError::InvalidBody(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<SecretError> for ApiError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::MissingName => Self::MissingParameter,
            SecretError::NotFound(name) => Self::NotFound(name),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => Self::Upstream { status, body },
            UpstreamError::HttpClientBuild(_) | UpstreamError::Transport(_) | UpstreamError::Parse(_) => {
                Self::Transport(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = api_error_to_status(&self);
        match self {
            Self::Upstream { body, .. } => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
