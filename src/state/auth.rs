//! Auth-session state for the running client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and user-aware commands; written only by the
//! session controller (resolve, login, register, logout, invalidate).

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use crate::net::types::AuthenticatedUser;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthenticatedUser>,
    /// True only until the start-up resolution step completes.
    pub loading: bool,
    /// A login/register call is awaiting the remote side.
    pub in_flight: bool,
}

/// Named states of the session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Unresolved,
    Anonymous,
    Authenticating,
    Authenticated,
}

impl AuthState {
    /// Initial state at process start.
    #[must_use]
    pub fn unresolved() -> Self {
        Self { user: None, loading: true, in_flight: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Unresolved
        } else if self.in_flight {
            SessionPhase::Authenticating
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::unresolved()
    }
}
