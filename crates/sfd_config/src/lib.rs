mod error;
mod loader;
pub mod models;

pub use error::ConfigError;
pub use loader::{load_config, load_config_or_default};
pub use models::browser::{BrowserConfig, RefreshConfig};
pub use models::directory::{DEFAULT_DIRECTORY_ENDPOINT, DEFAULT_SOAP_ACTION, DirectoryConfig};
pub use models::geo::{DEFAULT_GEO_BASE_URL, GeoConfig};
pub use models::logging::LoggingConfig;
