//! Anthropic Messages API forwarder.
//!
//! Thin HTTP wrapper for `/v1/messages`. Request and success reply bytes pass
//! through untouched; the only additions are the credential, version and
//! content-type headers. Pure reply classification lives in `parse_reply` for
//! testability.

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;

use super::types::{ChatUpstream, UpstreamError};
use crate::config::{AnthropicConfig, UpstreamTimeouts};

const MESSAGES_PATH: &str = "/v1/messages";
pub const API_VERSION: &str = "2023-06-01";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`UpstreamError::HttpClientBuild`] if reqwest rejects the settings.
    pub fn new(api_key: SecretString, base_url: &str, timeouts: UpstreamTimeouts) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeouts.request {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = timeouts.connect {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        let endpoint = format!("{}{MESSAGES_PATH}", base_url.trim_end_matches('/'));
        Ok(Self { http, api_key, endpoint })
    }

    /// Build a client from config, or `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::HttpClientBuild`] if reqwest rejects the settings.
    pub fn from_config(config: AnthropicConfig) -> Result<Option<Self>, UpstreamError> {
        let AnthropicConfig { api_key, base_url, timeouts } = config;
        api_key.map(|key| Self::new(key, &base_url, timeouts)).transpose()
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key_header(&self) -> Result<HeaderValue, UpstreamError> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| UpstreamError::Transport("configured API key is not a valid header value".into()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[async_trait::async_trait]
impl ChatUpstream for AnthropicClient {
    async fn forward(&self, body: Bytes) -> Result<Bytes, UpstreamError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key_header()?)
            .header("anthropic-version", API_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        parse_reply(status, body)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// JSON bodies are returned as received; they are only checked for
/// well-formedness.
fn parse_reply(status: u16, body: Bytes) -> Result<Bytes, UpstreamError> {
    let is_json = serde_json::from_slice::<IgnoredAny>(&body);

    if (200..300).contains(&status) {
        is_json.map_err(|e| UpstreamError::Parse(e.to_string()))?;
        return Ok(body);
    }

    let body = match is_json {
        Ok(_) => body,
        Err(_) => {
            let wrapped = serde_json::json!({ "error": String::from_utf8_lossy(&body), "status": status });
            Bytes::from(wrapped.to_string())
        }
    };
    Err(UpstreamError::Status { status, body })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
