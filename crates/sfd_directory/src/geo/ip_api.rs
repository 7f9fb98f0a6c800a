use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sfd_config::GeoConfig;
use tracing::debug;

use crate::error::GeoError;
use crate::geo::{GeoProvider, GeoRecord};

/// Field mask selecting `status` and `countryCode`.
pub const IP_API_FIELDS: u32 = 16386;

/// Client for the ip-api.com JSON endpoints.
#[derive(Debug, Clone)]
pub struct IpApiClient {
    client: Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Client(e.to_string()))?;

        Ok(IpApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GeoConfig) -> Result<Self, GeoError> {
        Self::new(&config.base_url, config.timeout)
    }

    fn single_url(&self, address: &str) -> String {
        format!("{}/json/{}?fields={}", self.base_url, address, IP_API_FIELDS)
    }

    fn batch_url(&self) -> String {
        format!("{}/batch?fields={}", self.base_url, IP_API_FIELDS)
    }
}

#[async_trait]
impl GeoProvider for IpApiClient {
    async fn lookup(&self, address: &str) -> Result<GeoRecord, GeoError> {
        let response = self.client.get(self.single_url(address)).send().await?;

        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeoError::decode(e.to_string()))
    }

    async fn lookup_batch(&self, addresses: &[String]) -> Result<Vec<GeoRecord>, GeoError> {
        debug!("Batch geo lookup for {} addresses", addresses.len());

        let response = self
            .client
            .post(self.batch_url())
            .json(addresses)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeoError::decode(e.to_string()))
    }
}
