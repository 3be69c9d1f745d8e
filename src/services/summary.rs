//! Dashboard summary.

use std::sync::Arc;

use super::RecordError;
use crate::net::client::ApiClient;
use crate::net::types::Summary;

pub const SUMMARY_ENDPOINT: &str = "/summary";

pub struct SummaryService {
    client: Arc<ApiClient>,
}

impl SummaryService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns a [`RecordError`] if the request fails.
    pub async fn fetch(&self) -> Result<Summary, RecordError> {
        Ok(self.client.get_json(SUMMARY_ENDPOINT).await?)
    }
}
