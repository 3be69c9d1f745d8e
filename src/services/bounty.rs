//! Bounty endpoints and the single-field change workflows.

#[cfg(test)]
#[path = "bounty_test.rs"]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;

use super::RecordError;
use crate::net::client::ApiClient;
use crate::net::types::{Bounty, BountyCategory, BountyStatus, CreateBountyRequest, Priority, UpdateBountyRequest};
use crate::util::validate::{self, ValidationErrors};

pub const BOUNTIES_ENDPOINT: &str = "/bounties";

fn bounty_endpoint(id: &str) -> Result<String, ValidationErrors> {
    validate::validate_record_id(id)?;
    Ok(format!("{BOUNTIES_ENDPOINT}/{}", urlencoding::encode(id)))
}

fn search_endpoint() -> String {
    format!("{BOUNTIES_ENDPOINT}/search")
}

pub struct BountyService {
    client: Arc<ApiClient>,
}

impl BountyService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn list(&self) -> Result<Vec<Bounty>, RecordError> {
        Ok(self.client.get_json(BOUNTIES_ENDPOINT).await?)
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails or the bounty does not exist.
    pub async fn get(&self, id: &str) -> Result<Bounty, RecordError> {
        Ok(self.client.get_json(&bounty_endpoint(id)?).await?)
    }

    /// Server-side search (`GET /bounties/search?query=`).
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Bounty>, RecordError> {
        let request = self
            .client
            .request(Method::GET, &search_endpoint())
            .query(&[("query", query)]);
        Ok(self.client.execute_json(request).await?)
    }

    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for a malformed form, otherwise the remote error.
    pub async fn create(&self, request: &CreateBountyRequest) -> Result<Bounty, RecordError> {
        validate::validate_new_bounty(request, Utc::now())?;
        let bounty: Bounty = self.client.send_json(Method::POST, BOUNTIES_ENDPOINT, request).await?;
        tracing::info!(bounty_id = %bounty.id, "bounty created");
        Ok(bounty)
    }

    /// Partial update; only the fields set on `request` are sent.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for a malformed update, otherwise the remote error.
    pub async fn update(&self, request: &UpdateBountyRequest) -> Result<Bounty, RecordError> {
        validate::validate_bounty_update(request, Utc::now())?;
        let bounty: Bounty = self
            .client
            .send_json(Method::PUT, &bounty_endpoint(&request.id)?, request)
            .await?;
        tracing::info!(bounty_id = %bounty.id, "bounty updated");
        Ok(bounty)
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        self.client
            .send_empty::<()>(Method::DELETE, &bounty_endpoint(id)?, None)
            .await?;
        tracing::info!(bounty_id = %id, "bounty deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn set_status(&self, id: &str, status: BountyStatus) -> Result<Bounty, RecordError> {
        self.update(&UpdateBountyRequest { status: Some(status), ..UpdateBountyRequest::new(id) })
            .await
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn set_priority(&self, id: &str, priority: Priority) -> Result<Bounty, RecordError> {
        self.update(&UpdateBountyRequest { priority: Some(priority), ..UpdateBountyRequest::new(id) })
            .await
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn set_category(&self, id: &str, category: BountyCategory) -> Result<Bounty, RecordError> {
        self.update(&UpdateBountyRequest { category: Some(category), ..UpdateBountyRequest::new(id) })
            .await
    }

    /// Reward-assignment dialog.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] unless `amount` is positive, otherwise the remote error.
    pub async fn assign_reward(&self, id: &str, amount: f64) -> Result<Bounty, RecordError> {
        validate::validate_reward(amount)?;
        self.update(&UpdateBountyRequest { reward: Some(amount), ..UpdateBountyRequest::new(id) })
            .await
    }
}
