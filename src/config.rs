//! Process configuration, read once at startup.
//!
//! DESIGN
//! ======
//! Handlers never touch the process environment. `AppConfig` is built in
//! `main`, checked against [`AppConfig::REQUIRED_KEYS`], and injected into
//! handlers through `AppState`. Parsing goes through a lookup closure so
//! tests can build configs without mutating global env.

use std::time::Duration;

use secrecy::SecretString;

use crate::secrets::SecretStore;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Name of the provider credential. Also used in the "not configured" error.
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required keys are absent or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    /// A key is present but its value cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

// =============================================================================
// CONFIG
// =============================================================================

/// Optional transport timeouts for the upstream call.
///
/// Both are unset by default, in which case reqwest's own defaults apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpstreamTimeouts {
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
}

/// Settings for the Anthropic upstream.
#[derive(Debug)]
pub struct AnthropicConfig {
    /// `None` when `ANTHROPIC_API_KEY` is unset or empty.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub timeouts: UpstreamTimeouts,
}

#[derive(Debug)]
pub struct AppConfig {
    pub port: u16,
    pub anthropic: AnthropicConfig,
    /// Secrets served by `POST /get-secret`, loaded from `EXPOSED_SECRETS`.
    pub secrets: SecretStore,
    /// Abort startup when required keys are missing.
    pub strict: bool,
}

impl AppConfig {
    /// Keys without which some endpoint cannot do its job.
    pub const REQUIRED_KEYS: &'static [&'static str] = &[ANTHROPIC_API_KEY];

    /// Build config from process environment variables.
    ///
    /// - `PORT`: listen port, default 3000
    /// - `ANTHROPIC_API_KEY`: provider credential (required)
    /// - `ANTHROPIC_BASE_URL`: default `https://api.anthropic.com`
    /// - `ANTHROPIC_REQUEST_TIMEOUT_SECS` / `ANTHROPIC_CONNECT_TIMEOUT_SECS`: unset by default
    /// - `EXPOSED_SECRETS`: comma-separated names readable via `/get-secret`
    /// - `STRICT_CONFIG`: `true` (default) refuses to start with missing keys
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value fails to parse. Missing
    /// required keys are reported by [`AppConfig::validate`], not here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let api_key = non_empty(lookup(ANTHROPIC_API_KEY)).map(SecretString::new);
        let base_url = non_empty(lookup("ANTHROPIC_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = UpstreamTimeouts {
            request: parse_secs("ANTHROPIC_REQUEST_TIMEOUT_SECS", lookup("ANTHROPIC_REQUEST_TIMEOUT_SECS"))?,
            connect: parse_secs("ANTHROPIC_CONNECT_TIMEOUT_SECS", lookup("ANTHROPIC_CONNECT_TIMEOUT_SECS"))?,
        };

        let names = parse_list(lookup("EXPOSED_SECRETS").as_deref());
        let secrets = SecretStore::load(&names, &lookup);

        let strict = match non_empty(lookup("STRICT_CONFIG")) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { key: "STRICT_CONFIG", value: raw })?,
            None => true,
        };

        Ok(Self { port, anthropic: AnthropicConfig { api_key, base_url, timeouts }, secrets, strict })
    }

    /// Required keys that have no value.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        Self::REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| match *key {
                ANTHROPIC_API_KEY => self.anthropic.api_key.is_none(),
                _ => false,
            })
            .collect()
    }

    /// Check every required key is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] listing the absent keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_required();
        if missing.is_empty() { Ok(()) } else { Err(ConfigError::MissingRequired(missing)) }
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_secs(key: &'static str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::Invalid { key, value: raw }),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
    }
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
