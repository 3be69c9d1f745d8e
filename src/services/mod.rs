//! Record services: stateless wrappers around the bounty, tip and summary
//! endpoints.
//!
//! DESIGN
//! ======
//! Services share one [`ApiClient`](crate::net::client::ApiClient), so every
//! call passes through the bearer authorizer. Writes validate their payload
//! before anything is sent. Services never touch session state; callers
//! decide what a 401 means (see `App::checked`).
//!
//! Record ids are validated as a single path segment and percent-encoded
//! before they reach a URL.

pub mod bounty;
pub mod summary;
pub mod tip;

use crate::net::client::ApiError;
use crate::util::validate::ValidationErrors;

/// Errors produced by record service operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The payload failed client-side validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl RecordError {
    /// The server rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::Status { status: 404, .. }))
    }
}
