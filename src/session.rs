//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth provider resolves the session asynchronously. Its progress is
//! published here as a three-state machine so route guards can read a
//! snapshot (`SessionStore::snapshot`) or await changes
//! (`SessionStore::subscribe`) without knowing how the provider works.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    /// Elevated privilege, e.g. from a profile role.
    #[serde(default)]
    pub admin: bool,
}

/// Session resolution state.
///
/// Starts as `Resolving`; the first session check moves it to one of the
/// other two, and sign-in / sign-out events move between those.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Resolving,
    Unauthenticated,
    Authenticated(UserIdentity),
}

impl SessionState {
    /// `true` until the first session check completes.
    #[must_use]
    pub fn loading(&self) -> bool {
        matches!(self, Self::Resolving)
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Resolving | Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.admin)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the session state. Only the auth integration writes to it.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Resolving);
        Self { tx }
    }

    /// Receiver that observes every subsequent transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Record the outcome of the initial session check.
    ///
    /// Ignored once resolved, so a slow check cannot overwrite a sign-in or
    /// sign-out that arrived first. Returns whether the state changed.
    pub fn resolve(&self, user: Option<UserIdentity>) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.loading() {
                return false;
            }
            *state = user.map_or(SessionState::Unauthenticated, SessionState::Authenticated);
            true
        })
    }

    pub fn sign_in(&self, user: UserIdentity) {
        tracing::debug!(user_id = %user.id, "session signed in");
        self.tx.send_replace(SessionState::Authenticated(user));
    }

    pub fn sign_out(&self) {
        tracing::debug!("session signed out");
        self.tx.send_replace(SessionState::Unauthenticated);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
