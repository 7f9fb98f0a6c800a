use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::GeoError;
use crate::geo::{GeoProvider, GeoRecord};

/// Geolocation service stand-in with call counters.
///
/// Addresses without a registered country answer with a failed record.
#[derive(Debug, Clone, Default)]
pub struct MockGeoProvider {
    countries: Arc<RwLock<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
    single_calls: Arc<AtomicUsize>,
    batch_calls: Arc<AtomicUsize>,
    batches: Arc<RwLock<Vec<Vec<String>>>>,
    batch_limit: Arc<RwLock<Option<usize>>>,
}

impl MockGeoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(self, address: &str, country_code: &str) -> Self {
        self.countries
            .write()
            .insert(address.to_string(), country_code.to_string());
        self
    }

    /// Makes every request fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Answers batches with at most `limit` records, dropping the tail.
    pub fn set_batch_limit(&self, limit: Option<usize>) {
        *self.batch_limit.write() = limit;
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Address lists of every batch request, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.read().clone()
    }

    fn record_for(&self, address: &str) -> GeoRecord {
        match self.countries.read().get(address) {
            Some(code) => GeoRecord::success(code),
            None => GeoRecord::failure(),
        }
    }

    fn check_available(&self) -> Result<(), GeoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GeoError::Status(503));
        }
        Ok(())
    }
}

#[async_trait]
impl GeoProvider for MockGeoProvider {
    async fn lookup(&self, address: &str) -> Result<GeoRecord, GeoError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.record_for(address))
    }

    async fn lookup_batch(&self, addresses: &[String]) -> Result<Vec<GeoRecord>, GeoError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.write().push(addresses.to_vec());
        self.check_available()?;
        let limit = self.batch_limit.read().unwrap_or(addresses.len());
        Ok(addresses
            .iter()
            .take(limit)
            .map(|a| self.record_for(a))
            .collect())
    }
}
