use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sfd_config::DirectoryConfig;
use tracing::debug;

use crate::directory::DirectoryProvider;
use crate::error::DirectoryError;

pub use sfd_config::{DEFAULT_DIRECTORY_ENDPOINT, DEFAULT_SOAP_ACTION};

pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// SOAP 1.2 request for the server list; the service accepts an empty token.
pub const GET_GAME_SERVERS_ENVELOPE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap12:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap12="http://www.w3.org/2003/05/soap-envelope">
  <soap12:Body>
    <GetGameServers xmlns="https://mythologicinteractive.com/Games/SFD/">
      <validationToken></validationToken>
    </GetGameServers>
  </soap12:Body>
</soap12:Envelope>"#;

#[derive(Debug, Clone)]
pub struct SoapDirectoryClient {
    client: Client,
    endpoint: String,
    soap_action: String,
}

impl SoapDirectoryClient {
    pub fn new(
        endpoint: &str,
        soap_action: &str,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Client(e.to_string()))?;

        Ok(SoapDirectoryClient {
            client,
            endpoint: endpoint.to_string(),
            soap_action: soap_action.to_string(),
        })
    }

    pub fn from_config(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        Self::new(&config.endpoint, &config.soap_action, config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DirectoryProvider for SoapDirectoryClient {
    async fn get_game_servers_xml(&self) -> Result<String, DirectoryError> {
        debug!("Requesting game servers from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", SOAP_CONTENT_TYPE)
            .header("SOAPAction", &self.soap_action)
            .body(GET_GAME_SERVERS_ENVELOPE)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
