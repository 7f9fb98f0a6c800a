use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::geo::{GeoProvider, UNKNOWN_COUNTRY};
use crate::server::Server;

/// Address to country-code cache in front of a [`GeoProvider`].
///
/// Entries never expire: failed lookups are stored as [`UNKNOWN_COUNTRY`] so a
/// provider outage cannot cause repeated calls for the same address. Clones
/// share the same entries.
///
/// The map lock is only held for in-memory reads and writes, never across a
/// remote call.
#[derive(Debug)]
pub struct CountryCache<G: GeoProvider> {
    provider: Arc<G>,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl<G: GeoProvider> Clone for CountryCache<G> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<G: GeoProvider> CountryCache<G> {
    pub fn new(provider: G) -> Self {
        Self {
            provider: Arc::new(provider),
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn provider(&self) -> &G {
        &self.provider
    }

    /// Cached code for `address`, without any remote call.
    pub fn get(&self, address: &str) -> Option<String> {
        self.entries.lock().get(address).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        debug!("Country cache cleared");
    }

    /// Resolves one address, using the single-address endpoint on a miss.
    #[instrument(name = "geo: lookup_one", skip(self))]
    pub async fn lookup_one(&self, address: &str) -> String {
        if let Some(code) = self.get(address) {
            debug!("Country cache hit for {}", address);
            return code;
        }

        let code = match self.provider.lookup(address).await {
            Ok(record) => record.country(),
            Err(e) => {
                warn!("Country lookup for {} failed: {}", address, e);
                UNKNOWN_COUNTRY.to_string()
            }
        };

        self.entries
            .lock()
            .insert(address.to_string(), code.clone());
        code
    }

    /// Resolves a set of addresses with at most one batch request.
    ///
    /// The returned map holds exactly the distinct input addresses.
    #[instrument(name = "geo: lookup_many", skip_all)]
    pub async fn lookup_many<I, S>(&self, addresses: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = addresses
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .filter(|a| seen.insert(a.clone()))
            .collect();

        let mut resolved = HashMap::with_capacity(unique.len());
        let mut uncached = Vec::new();
        {
            let entries = self.entries.lock();
            for address in unique {
                match entries.get(&address) {
                    Some(code) => {
                        resolved.insert(address, code.clone());
                    }
                    None => uncached.push(address),
                }
            }
        }

        if uncached.is_empty() {
            debug!("All {} addresses served from country cache", resolved.len());
            return resolved;
        }

        debug!(
            "{} cached, {} addresses need a batch lookup",
            resolved.len(),
            uncached.len()
        );

        let fetched: Vec<(String, String)> = match self.provider.lookup_batch(&uncached).await {
            Ok(records) => {
                if records.len() > uncached.len() {
                    warn!(
                        "Batch lookup returned {} results for {} addresses, ignoring extras",
                        records.len(),
                        uncached.len()
                    );
                }

                // results are correlated by position
                let mut records = records.into_iter();
                uncached
                    .into_iter()
                    .map(|address| {
                        let code = records
                            .next()
                            .map(|record| record.country())
                            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
                        (address, code)
                    })
                    .collect()
            }
            Err(e) => {
                warn!(
                    "Batch country lookup for {} addresses failed: {}",
                    uncached.len(),
                    e
                );
                uncached
                    .into_iter()
                    .map(|address| (address, UNKNOWN_COUNTRY.to_string()))
                    .collect()
            }
        };

        {
            let mut entries = self.entries.lock();
            for (address, code) in &fetched {
                entries.insert(address.clone(), code.clone());
            }
        }

        resolved.extend(fetched);
        resolved
    }

    /// Resolves the IPv4 address of every server in one pass.
    pub async fn lookup_servers(&self, servers: &[Server]) -> HashMap<String, String> {
        if servers.is_empty() {
            return HashMap::new();
        }
        self.lookup_many(servers.iter().map(|s| s.address_ipv4()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::MockGeoProvider;

    fn cache() -> CountryCache<MockGeoProvider> {
        CountryCache::new(
            MockGeoProvider::new()
                .with_country("1.1.1.1", "AU")
                .with_country("8.8.8.8", "US")
                .with_country("9.9.9.9", "CH"),
        )
    }

    #[tokio::test]
    async fn test_lookup_one_caches() {
        let cache = cache();

        assert_eq!(cache.lookup_one("1.1.1.1").await, "AU");
        assert_eq!(cache.lookup_one("1.1.1.1").await, "AU");
        assert_eq!(cache.provider().single_calls(), 1);
        assert_eq!(cache.get("1.1.1.1").as_deref(), Some("AU"));
    }

    #[tokio::test]
    async fn test_lookup_one_caches_failures() {
        let cache = cache();
        cache.provider().set_unavailable(true);

        assert_eq!(cache.lookup_one("8.8.8.8").await, UNKNOWN_COUNTRY);

        cache.provider().set_unavailable(false);
        assert_eq!(cache.lookup_one("8.8.8.8").await, UNKNOWN_COUNTRY);
        assert_eq!(cache.provider().single_calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_many_deduplicates() {
        let cache = cache();

        let result = cache
            .lookup_many(["8.8.8.8", "1.1.1.1", "8.8.8.8", "10.0.0.1"])
            .await;

        assert_eq!(result.len(), 3);
        assert_eq!(result["8.8.8.8"], "US");
        assert_eq!(result["1.1.1.1"], "AU");
        assert_eq!(result["10.0.0.1"], UNKNOWN_COUNTRY);
        assert_eq!(cache.provider().batch_calls(), 1);
        assert_eq!(
            cache.provider().batches(),
            vec![vec![
                "8.8.8.8".to_string(),
                "1.1.1.1".to_string(),
                "10.0.0.1".to_string()
            ]]
        );
    }

    #[tokio::test]
    async fn test_lookup_many_only_requests_uncached() {
        let cache = cache();
        cache.lookup_one("1.1.1.1").await;

        let result = cache.lookup_many(["1.1.1.1", "9.9.9.9"]).await;

        assert_eq!(result["1.1.1.1"], "AU");
        assert_eq!(result["9.9.9.9"], "CH");
        assert_eq!(cache.provider().batches(), vec![vec!["9.9.9.9".to_string()]]);
    }

    #[tokio::test]
    async fn test_short_batch_response_marks_rest_unknown() {
        let cache = cache();
        cache.provider().set_batch_limit(Some(1));

        let result = cache.lookup_many(["8.8.8.8", "9.9.9.9"]).await;

        assert_eq!(result["8.8.8.8"], "US");
        assert_eq!(result["9.9.9.9"], UNKNOWN_COUNTRY);
        assert_eq!(cache.get("9.9.9.9").as_deref(), Some(UNKNOWN_COUNTRY));
    }

    #[tokio::test]
    async fn test_clear_forgets_entries() {
        let cache = cache();
        cache.lookup_many(["8.8.8.8"]).await;
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());

        cache.lookup_many(["8.8.8.8"]).await;
        assert_eq!(cache.provider().batch_calls(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = cache();
        let other = cache.clone();

        cache.lookup_one("9.9.9.9").await;
        assert_eq!(other.get("9.9.9.9").as_deref(), Some("CH"));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let cache = cache();

        assert!(cache.lookup_many(Vec::<String>::new()).await.is_empty());
        assert!(cache.lookup_servers(&[]).await.is_empty());
        assert_eq!(cache.provider().batch_calls(), 0);
    }
}
