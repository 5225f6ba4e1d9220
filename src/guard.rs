//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision: wait while the session
//! resolves, send anonymous users to `/login` with the place they were going,
//! and send non-admins away from admin views. `evaluate` is a pure function
//! of a session snapshot. How the navigation layer obtains that snapshot
//! (callback, polling, or `RouteGuard::settle`) is up to it.

use std::fmt;

use tokio::sync::watch;

use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
const HOME_PATH: &str = "/";

// =============================================================================
// LOCATION
// =============================================================================

/// A navigable location, split the way browser history reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    #[must_use]
    pub fn new(pathname: impl Into<String>) -> Self {
        Self { pathname: pathname.into(), search: String::new(), hash: String::new() }
    }

    /// Split an in-app href such as `/create?job=42#cv`. An empty path becomes `/`.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(i) => href.split_at(i),
            None => (href, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        let pathname = if pathname.is_empty() { HOME_PATH } else { pathname };
        Self { pathname: pathname.to_owned(), search: search.to_owned(), hash: hash.to_owned() }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

// =============================================================================
// DECISION
// =============================================================================

/// A navigation the guard asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    /// Navigation intent handed to the target view.
    pub state: Option<Location>,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDecision {
    ShowLoadingPlaceholder,
    Redirect(Redirect),
    RenderChildren,
}

/// Decide what a protected route shows for `session`.
///
/// Checks run in order: loading, then authentication, then authorization.
#[must_use]
pub fn evaluate(session: &SessionState, require_admin: bool, current: &Location) -> RenderDecision {
    if session.loading() {
        return RenderDecision::ShowLoadingPlaceholder;
    }
    if session.user().is_none() {
        return RenderDecision::Redirect(Redirect { to: LOGIN_PATH, state: Some(current.clone()), replace: true });
    }
    if require_admin && !session.is_admin() {
        return RenderDecision::Redirect(Redirect { to: UNAUTHORIZED_PATH, state: None, replace: true });
    }
    RenderDecision::RenderChildren
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteGuard {
    pub require_admin: bool,
}

impl RouteGuard {
    /// Guard for views any signed-in user may see.
    #[must_use]
    pub fn protected() -> Self {
        Self { require_admin: false }
    }

    #[must_use]
    pub fn admin() -> Self {
        Self { require_admin: true }
    }

    #[must_use]
    pub fn evaluate(&self, session: &SessionState, current: &Location) -> RenderDecision {
        evaluate(session, self.require_admin, current)
    }

    /// Wait for the session to leave `Resolving`, then decide.
    ///
    /// If the session source goes away while still resolving, the loading
    /// placeholder is returned.
    pub async fn settle(&self, session: &mut watch::Receiver<SessionState>, current: &Location) -> RenderDecision {
        match session.wait_for(|state| !state.loading()).await {
            Ok(state) => self.evaluate(&state, current),
            Err(_) => RenderDecision::ShowLoadingPlaceholder,
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// The navigation primitive of the host environment.
pub trait Navigator {
    /// Go to `to`. `state` is the intent attached to the new entry.
    fn navigate(&mut self, to: &str, state: Option<&Location>, replace: bool);
}

impl RenderDecision {
    /// Perform any redirect through `navigator`. Returns `true` when the
    /// protected children may render.
    pub fn apply<N: Navigator + ?Sized>(&self, navigator: &mut N) -> bool {
        match self {
            Self::RenderChildren => true,
            Self::ShowLoadingPlaceholder => false,
            Self::Redirect(redirect) => {
                tracing::debug!(to = redirect.to, "route guard redirect");
                navigator.navigate(redirect.to, redirect.state.as_ref(), redirect.replace);
                false
            }
        }
    }
}

/// Where a completed login should go: the carried location, or `/` when
/// nothing was carried or it points back at the login page.
#[must_use]
pub fn login_return_target(state: Option<&Location>) -> Location {
    match state {
        Some(location) if location.pathname != LOGIN_PATH => location.clone(),
        _ => Location::default(),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
