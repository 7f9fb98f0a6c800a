use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::directory::DirectoryProvider;
use crate::error::DirectoryError;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
}

/// In-memory directory for tests; clones share the canned response and call count.
#[derive(Debug, Clone)]
pub struct MockDirectoryProvider {
    response: Arc<RwLock<MockResponse>>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockDirectoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDirectoryProvider {
    pub fn new() -> Self {
        Self {
            response: Arc::new(RwLock::new(MockResponse::Body(String::new()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_xml(self, xml: &str) -> Self {
        self.set_xml(xml);
        self
    }

    pub fn with_status(self, status: u16) -> Self {
        self.set_status(status);
        self
    }

    pub fn set_xml(&self, xml: &str) {
        *self.response.write() = MockResponse::Body(xml.to_string());
    }

    /// Makes every following request answer with a non-200 status.
    pub fn set_status(&self, status: u16) {
        *self.response.write() = MockResponse::Status(status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryProvider for MockDirectoryProvider {
    async fn get_game_servers_xml(&self) -> Result<String, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &*self.response.read() {
            MockResponse::Body(xml) => Ok(xml.clone()),
            MockResponse::Status(status) => Err(DirectoryError::Status(*status)),
        }
    }
}
