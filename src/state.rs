//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! built once from `AppConfig` and is read-only afterwards, so concurrent
//! requests share it without locks.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::{AnthropicClient, ChatUpstream, UpstreamError};
use crate::secrets::SecretStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// AI provider forwarder. `None` if no credential is configured.
    pub upstream: Option<Arc<dyn ChatUpstream>>,
    pub secrets: Arc<SecretStore>,
}

impl AppState {
    #[must_use]
    pub fn new(upstream: Option<Arc<dyn ChatUpstream>>, secrets: SecretStore) -> Self {
        Self { upstream, secrets: Arc::new(secrets) }
    }

    /// Build state from validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, UpstreamError> {
        let upstream = AnthropicClient::from_config(config.anthropic)?.map(|c| Arc::new(c) as Arc<dyn ChatUpstream>);
        Ok(Self::new(upstream, config.secrets))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use bytes::Bytes;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Upstream double that records every payload and answers once with a canned result.
    pub struct MockUpstream {
        reply: Mutex<Option<Result<Bytes, UpstreamError>>>,
        pub calls: Mutex<Vec<Bytes>>,
    }

    impl MockUpstream {
        /// Answer with the exact bytes given.
        #[must_use]
        pub fn replying_raw(reply: Result<Bytes, UpstreamError>) -> Arc<Self> {
            Arc::new(Self { reply: Mutex::new(Some(reply)), calls: Mutex::new(Vec::new()) })
        }

        #[must_use]
        pub fn replying(reply: Result<Value, UpstreamError>) -> Arc<Self> {
            Self::replying_raw(reply.map(|value| Bytes::from(value.to_string())))
        }

        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ChatUpstream for MockUpstream {
        async fn forward(&self, body: Bytes) -> Result<Bytes, UpstreamError> {
            self.calls.lock().unwrap().push(body);
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(UpstreamError::Transport("mock reply already consumed".into())))
        }
    }

    /// State with no upstream and no secrets.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None, SecretStore::new())
    }

    /// State backed by the given upstream double.
    #[must_use]
    pub fn test_app_state_with_upstream(upstream: Arc<MockUpstream>) -> AppState {
        AppState::new(Some(upstream as Arc<dyn ChatUpstream>), SecretStore::new())
    }

    /// State exposing the given secrets.
    #[must_use]
    pub fn test_app_state_with_secrets(secrets: SecretStore) -> AppState {
        AppState::new(None, secrets)
    }
}
