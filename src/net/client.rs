//! HTTP client for the admin API with an explicit request-authorization hook.
//!
//! ARCHITECTURE
//! ============
//! Every request is built through [`ApiClient::request`], which runs the
//! [`RequestAuthorizer`] installed at construction time and tags the request
//! with an `x-request-id`. The authorizer only decorates outgoing requests; it
//! never inspects responses, so 401 handling stays with the caller.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] with the raw body preserved
//! for display. No retries are attempted here.

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::Config;
use crate::state::token_store::TokenStore;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server explicitly rejected the bearer credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// The server rejected the credential or the identity behind it.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }

    /// Human-readable message from a JSON error body (`message` or `error`),
    /// falling back to the raw body.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let field = parsed.as_ref().and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        });
        field.or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_owned()))
    }
}

// =============================================================================
// REQUEST AUTHORIZER
// =============================================================================

/// Hook run on every outgoing request before dispatch.
pub trait RequestAuthorizer: Send + Sync {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Attaches `Authorization: Bearer <token>` when the store holds a token.
pub struct BearerAuthorizer {
    tokens: Arc<dyn TokenStore>,
}

impl BearerAuthorizer {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl RequestAuthorizer for BearerAuthorizer {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    authorizer: Arc<dyn RequestAuthorizer>,
}

impl ApiClient {
    /// Build a client for `config.api_url` with `authorizer` installed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot initialize.
    pub fn new(config: &Config, authorizer: Arc<dyn RequestAuthorizer>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.trim_end_matches('/').to_owned(), authorizer })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path` (relative to the base URL) with the
    /// authorization hook already applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.endpoint(path))
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        self.authorizer.authorize(builder)
    }

    /// `GET path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status or decode failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(self.request(Method::GET, path)).await
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status or decode failure.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(self.request(method, path).json(body)).await
    }

    /// Send a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.dispatch(builder).await.map(|_| ())
    }

    /// Dispatch a prepared request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status or decode failure.
    pub async fn execute_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(builder).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::debug!(%method, path = url.path(), %request_id, error = %e, "api request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(%method, path = url.path(), %request_id, status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        Err(status_error(status, response.text().await.unwrap_or_default()))
    }
}

fn status_error(status: StatusCode, body: String) -> ApiError {
    ApiError::Status { status: status.as_u16(), body }
}
