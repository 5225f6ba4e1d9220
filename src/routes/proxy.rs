//! `POST /anthropic-proxy`: forward a chat request with the server-held key.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::config::ANTHROPIC_API_KEY;
use crate::error::ApiError;
use crate::llm::RequestSummary;
use crate::state::AppState;

/// Relay the JSON body to the provider and its reply back, one attempt only.
/// The body is parsed to validate it and read log metadata, but the original
/// bytes are what goes upstream.
///
/// # Errors
///
/// `Configuration` when no key is set (no upstream call is made),
/// `InvalidBody` for non-JSON input, and `Upstream`/`Transport` as returned
/// by the forwarder.
pub async fn anthropic_proxy(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse, ApiError> {
    let Some(upstream) = state.upstream.as_deref() else {
        tracing::error!("anthropic proxy called but {ANTHROPIC_API_KEY} is not configured");
        return Err(ApiError::Configuration(format!("{ANTHROPIC_API_KEY} is not configured on the server")));
    };

    let payload: Value = serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let summary = RequestSummary::of(&payload);
    tracing::info!(
        model = summary.model.unwrap_or("<unset>"),
        messages = summary.message_count,
        max_tokens = ?summary.max_tokens,
        "forwarding chat request"
    );

    match upstream.forward(body).await {
        Ok(reply) => {
            tracing::info!(bytes = reply.len(), "upstream call succeeded");
            Ok(([(CONTENT_TYPE, "application/json")], reply))
        }
        Err(e) => {
            tracing::warn!(error = %e, "upstream call failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
