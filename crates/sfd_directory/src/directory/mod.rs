pub mod mock;
pub mod soap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

use crate::error::DirectoryError;
use crate::parser::parse_servers;
use crate::server::Server;

/// Transport that retrieves the raw `GetGameServers` response.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Performs one request and returns the XML body of a successful (200) response.
    async fn get_game_servers_xml(&self) -> Result<String, DirectoryError>;
}

/// Receiver of a completed server listing.
pub trait ServerSink: Send + Sync {
    fn deliver(&self, servers: Vec<Server>);
}

impl<F> ServerSink for F
where
    F: Fn(Vec<Server>) + Send + Sync,
{
    fn deliver(&self, servers: Vec<Server>) {
        self(servers)
    }
}

/// Sink forwarding each listing to an asynchronous consumer.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::UnboundedSender<Vec<Server>>);

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Vec<Server>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl ServerSink for ChannelSink {
    fn deliver(&self, servers: Vec<Server>) {
        if self.0.send(servers).is_err() {
            debug!("Server listing receiver dropped, discarding delivery");
        }
    }
}

/// Fetches, parses and filters the directory listing.
///
/// Every call performs exactly one request through the provider; retries are
/// left to the caller.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher<P: DirectoryProvider> {
    provider: P,
}

impl<P: DirectoryProvider> DirectoryFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches the listing, surfacing the failure reason.
    ///
    /// Entries with `version_nr == 0` are placeholders emitted by the directory
    /// and are removed.
    pub async fn try_fetch(&self) -> Result<Vec<Server>, DirectoryError> {
        let xml = self.provider.get_game_servers_xml().await?;
        let parsed = parse_servers(&xml)?;
        let total = parsed.len();

        let servers: Vec<Server> = parsed
            .into_iter()
            .filter(|server| server.version_nr() != 0)
            .collect();

        debug!(
            "Directory returned {} servers ({} without version dropped)",
            servers.len(),
            total - servers.len()
        );
        Ok(servers)
    }

    /// Fetches the listing; `None` means no servers are available this cycle.
    #[instrument(name = "directory: fetch", skip(self))]
    pub async fn fetch(&self) -> Option<Vec<Server>> {
        match self.try_fetch().await {
            Ok(servers) => Some(servers),
            Err(e) => {
                warn!("Failed to fetch game servers: {}", e);
                None
            }
        }
    }

    /// Fetches the listing and hands it to `sink`. Returns whether anything was delivered.
    pub async fn fetch_into<S: ServerSink + ?Sized>(&self, sink: &S) -> bool {
        match self.fetch().await {
            Some(servers) => {
                sink.deliver(servers);
                true
            }
            None => false,
        }
    }
}

pub use mock::MockDirectoryProvider;
pub use soap::SoapDirectoryClient;
