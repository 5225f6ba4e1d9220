//! Upstream errors, the forwarding trait and log-safe request metadata.

use bytes::Bytes;
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while forwarding a request to the AI provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-success status. `body` is its JSON
    /// error payload as received, or a `{ error, status }` wrapper when it
    /// was not JSON.
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Bytes },

    /// The provider answered 2xx but the body was not valid JSON.
    #[error("upstream response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// FORWARDING TRAIT
// =============================================================================

/// A single-attempt pass-through to a chat/completion API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Send the JSON document `body` upstream byte for byte and return the
    /// provider's reply bytes unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-success
    /// status, or a success reply that is not JSON.
    async fn forward(&self, body: Bytes) -> Result<Bytes, UpstreamError>;
}

// =============================================================================
// REQUEST SUMMARY
// =============================================================================

/// Non-sensitive metadata pulled from a chat request for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSummary<'a> {
    pub model: Option<&'a str>,
    pub message_count: usize,
    pub max_tokens: Option<u64>,
}

impl<'a> RequestSummary<'a> {
    /// Never fails: fields missing or of the wrong type are reported as absent.
    #[must_use]
    pub fn of(body: &'a Value) -> Self {
        Self {
            model: body.get("model").and_then(Value::as_str),
            message_count: body.get("messages").and_then(Value::as_array).map_or(0, Vec::len),
            max_tokens: body.get("max_tokens").and_then(Value::as_u64),
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
