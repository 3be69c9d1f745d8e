//! Tip endpoints. Updates that change priority, status or reward are followed
//! by `POST /tips/{id}/notify` so the reporter hears about it.

#[cfg(test)]
#[path = "tip_test.rs"]
mod tests;

use std::sync::Arc;

use reqwest::Method;

use super::RecordError;
use crate::net::client::ApiClient;
use crate::net::types::{CreateTipRequest, Priority, Tip, TipStatus, UpdateTipRequest};
use crate::util::validate::{self, ValidationErrors};

pub const TIPS_ENDPOINT: &str = "/tips";

fn tip_endpoint(id: &str) -> Result<String, ValidationErrors> {
    validate::validate_record_id(id)?;
    Ok(format!("{TIPS_ENDPOINT}/{}", urlencoding::encode(id)))
}

pub struct TipService {
    client: Arc<ApiClient>,
}

impl TipService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn list(&self) -> Result<Vec<Tip>, RecordError> {
        Ok(self.client.get_json(TIPS_ENDPOINT).await?)
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails or the tip does not exist.
    pub async fn get(&self, id: &str) -> Result<Tip, RecordError> {
        Ok(self.client.get_json(&tip_endpoint(id)?).await?)
    }

    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for a malformed form, otherwise the remote error.
    pub async fn create(&self, request: &CreateTipRequest) -> Result<Tip, RecordError> {
        validate::validate_new_tip(request)?;
        let tip: Tip = self.client.send_json(Method::POST, TIPS_ENDPOINT, request).await?;
        tracing::info!(tip_id = %tip.id, "tip created");
        Ok(tip)
    }

    /// Partial update, then a notify call if a watched field changed.
    ///
    /// The notify call is best-effort: the update has already been applied,
    /// so its failure is logged rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for a malformed update, otherwise the
    /// error from the update call.
    pub async fn update(&self, request: &UpdateTipRequest) -> Result<Tip, RecordError> {
        validate::validate_tip_update(request)?;
        let path = tip_endpoint(&request.id)?;
        let tip: Tip = self.client.send_json(Method::PUT, &path, request).await?;
        tracing::info!(tip_id = %tip.id, "tip updated");

        if let Some(notification) = request.notify_payload() {
            if let Err(e) = self
                .client
                .send_empty(Method::POST, &format!("{path}/notify"), Some(&notification))
                .await
            {
                tracing::warn!(tip_id = %request.id, error = %e, "tip change notification failed");
            }
        }
        Ok(tip)
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        self.client
            .send_empty::<()>(Method::DELETE, &tip_endpoint(id)?, None)
            .await?;
        tracing::info!(tip_id = %id, "tip deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn set_status(&self, id: &str, status: TipStatus) -> Result<Tip, RecordError> {
        self.update(&UpdateTipRequest { status: Some(status), ..UpdateTipRequest::new(id) })
            .await
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn set_priority(&self, id: &str, priority: Priority) -> Result<Tip, RecordError> {
        self.update(&UpdateTipRequest { priority: Some(priority), ..UpdateTipRequest::new(id) })
            .await
    }

    /// Reward-assignment dialog.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] unless `amount` is positive, otherwise the remote error.
    pub async fn assign_reward(&self, id: &str, amount: f64) -> Result<Tip, RecordError> {
        validate::validate_reward(amount)?;
        self.update(&UpdateTipRequest { reward: Some(amount), ..UpdateTipRequest::new(id) })
            .await
    }
}
