//! `POST /get-secret`: resolve a named secret for a trusted caller.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRequest {
    #[serde(default)]
    pub secret_name: Option<Value>,
}

impl SecretRequest {
    /// The requested name. Anything but a JSON string counts as no name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.secret_name.as_ref().and_then(Value::as_str).unwrap_or_default()
    }
}

#[derive(Serialize)]
pub struct SecretResponse {
    pub value: String,
}

/// An empty body is treated as `{}` so it reports the missing name.
fn parse_request(body: &[u8]) -> Result<SecretRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SecretRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// # Errors
///
/// `MissingParameter` (400) for an absent, empty or non-string name,
/// `NotFound` (404) for an unknown one, `InvalidBody` (500) when the body is
/// not a JSON object.
pub async fn get_secret(State(state): State<AppState>, body: Bytes) -> Result<Json<SecretResponse>, ApiError> {
    let request = parse_request(&body)?;
    let name = request.name();

    let value = state.secrets.get(name).inspect_err(|e| tracing::debug!(error = %e, "secret lookup failed"))?;

    tracing::debug!(secret = %name, "secret resolved");
    Ok(Json(SecretResponse { value: value.expose_secret().clone() }))
}

#[cfg(test)]
#[path = "secrets_test.rs"]
mod tests;
