//! Time/distance matrix API client
//!
//! Minimal pass-through client for the one-to-many matrix service. No
//! retries, caching or rate limiting happen here.

use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    matrix::models::{Costing, Location, MatrixRequest, MatrixResponse},
};

/// Matrix API client
pub struct MatrixClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MatrixClient {
    /// Create a new matrix client
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from configuration, if an API key is configured
    pub fn from_config(client: reqwest::Client, config: &Config) -> Option<Self> {
        config
            .matrix_api_key
            .as_deref()
            .map(|key| Self::new(client, &config.matrix_api_url, key))
    }

    /// Times and distances from `origin` to every destination
    #[instrument(skip(self, destinations, costing), fields(destinations = destinations.len(), costing = %costing))]
    pub async fn one_to_many(
        &self,
        origin: Location,
        destinations: &[Location],
        costing: Costing,
    ) -> AppResult<MatrixResponse> {
        if destinations.is_empty() {
            return Err(AppError::BadRequest(
                "at least one destination is required".to_string(),
            ));
        }

        let mut locations = Vec::with_capacity(destinations.len() + 1);
        locations.push(origin);
        locations.extend_from_slice(destinations);

        let payload = serde_json::to_string(&MatrixRequest {
            locations: &locations,
        })?;
        let url = format!("{}/one_to_many", self.base_url);

        debug!(url = %url, payload = %payload, "Requesting one-to-many matrix");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("json", payload.as_str()),
                ("costing", costing.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Matrix response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Matrix request failed");
            return Err(AppError::UpstreamError(format!(
                "Matrix API error {}: {}",
                status, text
            )));
        }

        let body = response.text().await?;

        let result: MatrixResponse = match serde_json::from_str(&body) {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, body = %body, "Failed to parse matrix response");
                return Err(AppError::UpstreamError(format!(
                    "Failed to parse matrix response: {}",
                    e
                )));
            }
        };

        debug!(units = %result.units, "Successfully fetched matrix");
        Ok(result)
    }
}
