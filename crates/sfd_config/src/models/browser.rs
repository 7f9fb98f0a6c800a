use std::time::Duration;

use serde::Deserialize;

use super::{directory::DirectoryConfig, geo::GeoConfig, logging::LoggingConfig};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Delay between two directory fetches in watch mode.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// Top-level configuration file. Every section is optional.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    pub directory: DirectoryConfig,
    pub geo: GeoConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}
