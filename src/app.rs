//! Application wiring: one token store, one API client, one session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is the composition root. The token store is shared by the bearer
//! authorizer, the session controller and the route guard, so a token written
//! by login is visible to the next outgoing request without extra plumbing.
//!
//! ```text
//! TokenStore ──> BearerAuthorizer ──> ApiClient ──> HttpIdentityApi ──> AuthController
//!     │                                   └──> Bounty/Tip/Summary services
//!     └──> RouteGuard
//! ```

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::sync::Arc;

use crate::config::{Config, ConfigError, StoreLocation};
use crate::net::api::{HttpIdentityApi, IdentityApi};
use crate::net::client::{ApiClient, ApiError, BearerAuthorizer};
use crate::routes::{GuardDecision, History, Route, RouteGuard, normalize_path};
use crate::services::RecordError;
use crate::services::bounty::BountyService;
use crate::services::summary::SummaryService;
use crate::services::tip::TipService;
use crate::session::{AuthController, AuthError};
use crate::state::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ApiError),

    /// The guard sent a protected path to the login screen.
    #[error("login required to open {path}")]
    LoginRequired { path: String },

    #[error("session is still resolving")]
    Pending,

    /// The path does not name the requested screen.
    #[error("no screen at {0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

pub struct App {
    config: Config,
    tokens: Arc<dyn TokenStore>,
    history: Arc<History>,
    guard: RouteGuard,
    auth: AuthController,
    pub bounties: BountyService,
    pub tips: TipService,
    pub summary: SummaryService,
}

impl App {
    /// Build the app with the token store named by `config.store`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> = match &config.store {
            StoreLocation::Dir(dir) => Arc::new(FileTokenStore::in_dir(dir)),
            StoreLocation::Ephemeral => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(config, tokens)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the HTTP client cannot be built.
    pub fn with_store(config: Config, tokens: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        let client = Self::client(&config, &tokens)?;
        let identity: Arc<dyn IdentityApi> = Arc::new(HttpIdentityApi::new(Arc::clone(&client)));
        Ok(Self::assemble(config, tokens, client, identity))
    }

    /// Same as [`App::with_store`] but with a caller-supplied identity backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the HTTP client cannot be built.
    pub fn with_identity(
        config: Config,
        tokens: Arc<dyn TokenStore>,
        identity: Arc<dyn IdentityApi>,
    ) -> Result<Self, AppError> {
        let client = Self::client(&config, &tokens)?;
        Ok(Self::assemble(config, tokens, client, identity))
    }

    fn client(config: &Config, tokens: &Arc<dyn TokenStore>) -> Result<Arc<ApiClient>, ApiError> {
        let authorizer = Arc::new(BearerAuthorizer::new(Arc::clone(tokens)));
        Ok(Arc::new(ApiClient::new(config, authorizer)?))
    }

    fn assemble(
        config: Config,
        tokens: Arc<dyn TokenStore>,
        client: Arc<ApiClient>,
        identity: Arc<dyn IdentityApi>,
    ) -> Self {
        let history = Arc::new(History::default());
        let auth = AuthController::new(Arc::clone(&tokens), identity, Arc::clone(&history));
        Self {
            guard: RouteGuard::new(Arc::clone(&tokens)),
            bounties: BountyService::new(Arc::clone(&client)),
            tips: TipService::new(Arc::clone(&client)),
            summary: SummaryService::new(client),
            config,
            tokens,
            history,
            auth,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Resolve the session, then run `path` through the guard. On success the
    /// route becomes the current location.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LoginRequired`] when the guard redirects; the path
    /// has then been recorded for replay after the next login.
    pub async fn open(&self, path: &str) -> Result<Route, AppError> {
        let state = self.auth.resolve().await;
        match self.guard.check(&state, path) {
            GuardDecision::Render(route) => {
                self.history.navigate(&route.path());
                Ok(route)
            }
            GuardDecision::Redirect(to) => {
                self.history.navigate(&to);
                Err(AppError::LoginRequired { path: normalize_path(path) })
            }
            GuardDecision::Loading => Err(AppError::Pending),
        }
    }

    /// Open `route` and require the path to parse back to it. Ids that add
    /// segments or a query land elsewhere and are refused.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the path does not round-trip,
    /// otherwise the errors of [`App::open`].
    pub async fn enter(&self, route: Route) -> Result<(), AppError> {
        let path = route.path();
        let opened = self.open(&path).await?;
        if opened != route {
            return Err(AppError::NotFound(path));
        }
        Ok(())
    }

    /// Pass a record call's result through, dropping the session if the
    /// server rejected the token.
    ///
    /// # Errors
    ///
    /// Returns the record error wrapped in [`AppError::Record`].
    pub fn checked<T>(&self, result: Result<T, RecordError>) -> Result<T, AppError> {
        result.map_err(|e| {
            if e.is_unauthorized() {
                self.auth.invalidate();
            }
            AppError::Record(e)
        })
    }
}
