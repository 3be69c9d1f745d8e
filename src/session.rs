//! Auth session controller: resolve, login, register, logout.
//!
//! ARCHITECTURE
//! ============
//! The controller is the only writer of [`AuthState`] and of the token slot.
//! It owns no transport; identity calls go through [`IdentityApi`] and
//! navigation through the shared [`History`].
//!
//! ```text
//! UNRESOLVED --resolve ok--> AUTHENTICATED --logout/invalidate--> ANONYMOUS
//!     \--no token/failure--> ANONYMOUS --login/register ok--> AUTHENTICATED
//! ```
//!
//! Login and register hold an in-flight flag (AUTHENTICATING) for the
//! duration of the remote call; a second attempt while it is set fails with
//! [`AuthError::InFlight`] without touching the network. The state lock is
//! never held across an `.await`.
//!
//! TOKEN POLICY
//! ============
//! When start-up resolution fails, the stored token is cleared only if the
//! server explicitly rejected it (401/403). Transport errors and other
//! statuses keep the token so an outage does not force a new login.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::net::api::IdentityApi;
use crate::net::client::ApiError;
use crate::net::types::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, UserProfile};
use crate::routes::{DEFAULT_LANDING, History, LOGIN_PATH};
use crate::state::auth::AuthState;
use crate::state::token_store::{StoreError, TokenStore};
use crate::util::validate::{self, ValidationErrors};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The form failed client-side validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The remote side refused the credentials or the account.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Another login/register is still awaiting the server.
    #[error("an authentication request is already in progress")]
    InFlight,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// The server issued an empty token.
    #[error("server returned an empty token")]
    EmptyToken,

    #[error("could not persist session: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if let ApiError::Status { status, .. } = err {
            if (400..500).contains(&status) {
                let message = err.server_message().unwrap_or_else(|| format!("request rejected ({status})"));
                return Self::Rejected { status, message };
            }
        }
        Self::Api(err)
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct AuthController {
    state: Arc<RwLock<AuthState>>,
    tokens: Arc<dyn TokenStore>,
    identity: Arc<dyn IdentityApi>,
    history: Arc<History>,
    resolve_started: AtomicBool,
}

/// Clears the in-flight flag when the guarded call finishes, on every path.
struct FlightGuard {
    state: Arc<RwLock<AuthState>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).in_flight = false;
    }
}

impl AuthController {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>, identity: Arc<dyn IdentityApi>, history: Arc<History>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::unresolved())),
            tokens,
            identity,
            history,
            resolve_started: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.state.write().unwrap_or_else(PoisonError::into_inner));
    }

    fn begin_flight(&self) -> Result<FlightGuard, AuthError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.in_flight {
            return Err(AuthError::InFlight);
        }
        state.in_flight = true;
        Ok(FlightGuard { state: Arc::clone(&self.state) })
    }

    /// Read and clear the intended path in one step.
    fn take_intended_path(&self) -> Option<String> {
        let path = self.tokens.intended_path()?;
        if let Err(e) = self.tokens.clear_intended_path() {
            tracing::warn!(error = %e, "failed to clear intended path");
        }
        Some(path)
    }

    /// Start-up session resolution. Runs once per controller; later calls
    /// return the current state unchanged.
    pub async fn resolve(&self) -> AuthState {
        if self.resolve_started.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        if self.tokens.token().is_none() {
            tracing::debug!("no stored token; session is anonymous");
            self.update(|s| s.loading = false);
            return self.state();
        }

        match self.identity.me().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session resolved");
                self.update(|s| {
                    s.user = Some(user);
                    s.loading = false;
                });
                if let Some(path) = self.take_intended_path() {
                    self.history.navigate(&path);
                }
            }
            Err(err) => {
                let clear = err.is_auth_rejection();
                tracing::warn!(error = %err, clear_token = clear, "session resolution failed");
                if clear {
                    if let Err(e) = self.tokens.clear_token() {
                        tracing::warn!(error = %e, "failed to clear rejected token");
                    }
                }
                self.update(|s| {
                    s.user = None;
                    s.loading = false;
                });
            }
        }
        self.state()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a malformed form,
    /// [`AuthError::InFlight`] if another attempt is pending,
    /// [`AuthError::Rejected`] for bad credentials, or a transport/store error.
    /// The session is unchanged on every error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        validate::validate_login(email, password)?;
        let _flight = self.begin_flight()?;

        let request = LoginRequest { email: email.trim().to_owned(), password: password.to_owned() };
        let response = self.identity.login(&request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "login failed");
            AuthError::from(e)
        })?;
        let user = self.establish(response)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthController::login`]; a duplicate account surfaces as
    /// [`AuthError::Rejected`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        validate::validate_register(username, email, password)?;
        let _flight = self.begin_flight()?;

        let request = RegisterRequest {
            username: username.trim().to_owned(),
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        let response = self.identity.register(&request).await.map_err(|e| {
            tracing::warn!(email = %request.email, error = %e, "register failed");
            AuthError::from(e)
        })?;
        let user = self.establish(response)?;
        tracing::info!(user_id = %user.id, "registration succeeded");
        Ok(user)
    }

    /// Persist the issued token, publish the user and replay the intended path.
    fn establish(&self, response: AuthResponse) -> Result<AuthenticatedUser, AuthError> {
        if response.token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.tokens.store_token(&response.token)?;
        // The issued token is authoritative; a later resolve must not re-check it.
        self.resolve_started.store(true, Ordering::SeqCst);

        let user = response.user;
        self.update(|s| {
            s.user = Some(user.clone());
            s.loading = false;
        });

        let target = self.take_intended_path().unwrap_or_else(|| DEFAULT_LANDING.to_owned());
        self.history.navigate(&target);
        Ok(user)
    }

    /// Sign out. Remote failures are logged and ignored; local state is
    /// always cleared.
    pub async fn logout(&self) {
        if self.tokens.token().is_some() {
            if let Err(e) = self.identity.logout().await {
                tracing::warn!(error = %e, "remote logout failed; clearing local session anyway");
            }
        } else {
            tracing::debug!("logout without stored token; skipping remote call");
        }
        self.drop_session();
        self.history.navigate(LOGIN_PATH);
        tracing::info!("logged out");
    }

    /// A call found the token invalid: fall back to anonymous.
    pub fn invalidate(&self) {
        tracing::info!("token rejected by server; session invalidated");
        self.drop_session();
    }

    fn drop_session(&self) {
        if let Err(e) = self.tokens.clear_token() {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
        self.update(|s| {
            s.user = None;
            s.loading = false;
        });
    }

    /// Server-confirmed profile update. The session user is replaced with the
    /// server's response only after it succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] without a session,
    /// [`AuthError::Validation`] for a malformed profile, or the remote error.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<AuthenticatedUser, AuthError> {
        if self.state().user.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        validate::validate_profile(profile)?;

        let user = self.identity.update_profile(profile).await.map_err(|e| {
            if e.is_unauthorized() {
                self.invalidate();
            }
            AuthError::from(e)
        })?;
        self.update(|s| s.user = Some(user.clone()));
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}
