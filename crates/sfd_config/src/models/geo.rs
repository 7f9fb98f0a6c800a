use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GEO_BASE_URL: &str = "http://ip-api.com";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeoConfig {
    pub enabled: bool,
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_GEO_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
