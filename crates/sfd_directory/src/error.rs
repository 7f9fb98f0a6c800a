use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Directory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Directory responded with status {0}")]
    Status(u16),

    #[error("Malformed directory XML: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for DirectoryError {
    fn from(error: quick_xml::Error) -> Self {
        DirectoryError::Xml(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Geo lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geo service responded with status {0}")]
    Status(u16),

    #[error("Failed to decode geo response: {0}")]
    Decode(String),
}

impl DirectoryError {
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }
}

impl GeoError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
