//! Remote identity endpoints (`/auth/*`).
//!
//! The session controller depends on the [`IdentityApi`] trait rather than the
//! HTTP client so tests can drive the lifecycle with a scripted fake.

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use std::sync::Arc;

use reqwest::Method;

use super::client::{ApiClient, ApiError};
use super::types::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, UserProfile};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const ME_ENDPOINT: &str = "/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const PROFILE_ENDPOINT: &str = "/auth/profile";

/// Identity operations consumed by the session controller.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or credentials are rejected.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the account is refused.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// `GET /auth/me` using whatever token the authorizer attaches.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the token is rejected.
    async fn me(&self) -> Result<AuthenticatedUser, ApiError>;

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `PUT /auth/profile`, returning the server's view of the account.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the update is refused.
    async fn update_profile(&self, profile: &UserProfile) -> Result<AuthenticatedUser, ApiError>;
}

/// [`IdentityApi`] over the shared, bearer-authorized HTTP client.
pub struct HttpIdentityApi {
    client: Arc<ApiClient>,
}

impl HttpIdentityApi {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.send_json(Method::POST, LOGIN_ENDPOINT, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.send_json(Method::POST, REGISTER_ENDPOINT, request).await
    }

    async fn me(&self) -> Result<AuthenticatedUser, ApiError> {
        self.client.get_json(ME_ENDPOINT).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.send_empty::<()>(Method::POST, LOGOUT_ENDPOINT, None).await
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<AuthenticatedUser, ApiError> {
        self.client.send_json(Method::PUT, PROFILE_ENDPOINT, profile).await
    }
}
