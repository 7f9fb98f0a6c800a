pub mod cache;
pub mod ip_api;
pub mod mock;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::GeoError;

/// Country code recorded for addresses that could not be resolved.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// One lookup result as returned by the geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeoRecord {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "countryCode", default)]
    pub country_code: Option<String>,
}

impl GeoRecord {
    pub fn success(country_code: &str) -> Self {
        Self {
            status: "success".to_string(),
            country_code: Some(country_code.to_string()),
        }
    }

    pub fn failure() -> Self {
        Self {
            status: "fail".to_string(),
            country_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Resolved country code, or [`UNKNOWN_COUNTRY`] for anything but a successful lookup.
    pub fn country(&self) -> String {
        match (&self.country_code, self.is_success()) {
            (Some(code), true) if !code.is_empty() => code.clone(),
            _ => UNKNOWN_COUNTRY.to_string(),
        }
    }
}

/// Remote geolocation service.
///
/// Batch results are aligned with the request by position, not by address.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<GeoRecord, GeoError>;

    async fn lookup_batch(&self, addresses: &[String]) -> Result<Vec<GeoRecord>, GeoError>;
}

pub use cache::CountryCache;
pub use ip_api::IpApiClient;
pub use mock::MockGeoProvider;
