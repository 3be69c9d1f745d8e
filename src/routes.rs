//! Route table, navigation history and the route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every command maps to one of these paths and is checked by [`RouteGuard`]
//! before it runs. `/login` and `/register` are exempt so the guard can never
//! redirect the login screen to itself.

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

use std::sync::{Arc, Mutex, PoisonError};

use crate::state::auth::AuthState;
use crate::state::token_store::TokenStore;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
/// Where a successful login lands when no intended path was recorded.
pub const DEFAULT_LANDING: &str = "/";

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Bounties,
    CreateBounty,
    EditBounty(String),
    ViewBounty(String),
    Tips,
    CreateTip,
    EditTip(String),
    ViewTip(String),
    Profile,
    NotFound(String),
}

/// Strip query/fragment and trailing slashes; empty becomes `/`.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_LANDING.to_owned();
    }
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

impl Route {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let path = normalize_path(raw);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["dashboard"] => Self::Dashboard,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["profile"] => Self::Profile,
            ["bounties"] => Self::Bounties,
            ["bounties", "create"] => Self::CreateBounty,
            ["bounties", "edit", id] => Self::EditBounty((*id).to_owned()),
            ["bounties", "view", id] => Self::ViewBounty((*id).to_owned()),
            ["tips"] => Self::Tips,
            ["tips", "create"] => Self::CreateTip,
            ["tips", "edit", id] => Self::EditTip((*id).to_owned()),
            ["tips", "view", id] => Self::ViewTip((*id).to_owned()),
            _ => Self::NotFound(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => LOGIN_PATH.to_owned(),
            Self::Register => REGISTER_PATH.to_owned(),
            Self::Dashboard => DEFAULT_LANDING.to_owned(),
            Self::Bounties => "/bounties".to_owned(),
            Self::CreateBounty => "/bounties/create".to_owned(),
            Self::EditBounty(id) => format!("/bounties/edit/{id}"),
            Self::ViewBounty(id) => format!("/bounties/view/{id}"),
            Self::Tips => "/tips".to_owned(),
            Self::CreateTip => "/tips/create".to_owned(),
            Self::EditTip(id) => format!("/tips/edit/{id}"),
            Self::ViewTip(id) => format!("/tips/view/{id}"),
            Self::Profile => "/profile".to_owned(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Login and register never require a session.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Navigation log. The last entry is the current location.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self { entries: Mutex::new(vec![normalize_path(initial)]) }
    }

    pub fn navigate(&self, path: &str) {
        let path = normalize_path(path);
        tracing::debug!(%path, "navigate");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| DEFAULT_LANDING.to_owned())
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_LANDING)
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// Outcome of checking a route against the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a neutral indicator, do not redirect.
    Loading,
    /// Anonymous access to a protected route; go here instead.
    Redirect(String),
    /// Render the requested screen.
    Render(Route),
}

/// Redirect to login once auth has loaded and no user is present.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

pub struct RouteGuard {
    tokens: Arc<dyn TokenStore>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// Decide what to show for `path` under `state`. Records the path as the
    /// intended redirect target when access is denied.
    pub fn check(&self, state: &AuthState, path: &str) -> GuardDecision {
        let route = Route::parse(path);
        if route.is_public() {
            return GuardDecision::Render(route);
        }
        if state.loading {
            return GuardDecision::Loading;
        }
        if should_redirect_unauth(state) {
            let intended = route.path();
            if let Err(e) = self.tokens.set_intended_path(&intended) {
                tracing::warn!(path = %intended, error = %e, "failed to record intended path");
            }
            tracing::info!(path = %intended, "unauthenticated access; redirecting to login");
            return GuardDecision::Redirect(LOGIN_PATH.to_owned());
        }
        GuardDecision::Render(route)
    }
}
