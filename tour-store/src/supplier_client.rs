use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tour_core::query::{AvailabilityEnvelope, AvailabilityQuery, TourOptionsEnvelope, TourOptionsQuery};
use tour_core::{SupplierError, TourSupplier};
use tracing::debug;

use crate::app_config::SupplierConfig;

/// REST client for the tour backend
#[derive(Clone)]
pub struct HttpTourSupplier {
    client: Client,
    tour_options_url: String,
    availability_url: String,
}

impl HttpTourSupplier {
    pub fn new(config: &SupplierConfig) -> Result<Self, SupplierError> {
        let mut builder = Client::builder().user_agent("tour-api/0.1");
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SupplierError::Transport(e.to_string()))?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            tour_options_url: format!("{}{}", base, config.tour_options_path),
            availability_url: format!("{}{}", base, config.availability_path),
        })
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, SupplierError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let res = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| SupplierError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SupplierError::Status(status.as_u16()));
        }

        res.json::<T>()
            .await
            .map_err(|e| SupplierError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TourSupplier for HttpTourSupplier {
    async fn fetch_tour_options(
        &self,
        query: &TourOptionsQuery,
    ) -> Result<TourOptionsEnvelope, SupplierError> {
        debug!(tour_id = query.tour_id, travel_date = %query.travel_date, "Requesting tour options");
        self.post_json(&self.tour_options_url, query).await
    }

    async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityEnvelope, SupplierError> {
        debug!(tour_option_id = query.tour_option_id, "Requesting availability");
        self.post_json(&self.availability_url, query).await
    }
}
