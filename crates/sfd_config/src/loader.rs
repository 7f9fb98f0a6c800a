use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{BrowserConfig, ConfigError};

/// Reads and parses a TOML configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<BrowserConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Like [`load_config`], but no path means the built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<BrowserConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(BrowserConfig::default()),
    }
}
