use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_DIRECTORY_ENDPOINT: &str =
    "https://mythologicinteractive.com/SFDGameServices.asmx";
pub const DEFAULT_SOAP_ACTION: &str = "https://mythologicinteractive.com/Games/SFD/GetGameServers";

/// Where and how the server list is requested.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectoryConfig {
    pub endpoint: String,
    pub soap_action: String,
    /// Upper bound for one directory request.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DIRECTORY_ENDPOINT.to_string(),
            soap_action: DEFAULT_SOAP_ACTION.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
