//! Caching layer for station search responses.
//!
//! Only station search is cached. Timetables and train details are always
//! fetched fresh, since a manual refresh must actually refresh.
//!
//! Queries are normalised (trimmed, lowercased) before use as keys, so
//! "Lisboa" and "lisboa " share an entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Departure, Station, TrainId, TrainInformation};
use crate::fetch::TimetableSource;
use crate::ip::{IpClient, IpError, TimetableRequest};

/// Cached search result list.
type SearchEntry = Arc<Vec<Station>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 500,
        }
    }
}

/// Cache key for a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Cache for station search responses.
pub struct StationSearchCache {
    searches: MokaCache<String, SearchEntry>,
}

impl StationSearchCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { searches }
    }

    pub async fn get(&self, query: &str) -> Option<SearchEntry> {
        self.searches.get(&normalize_query(query)).await
    }

    pub async fn insert(&self, query: &str, entry: SearchEntry) {
        self.searches.insert(normalize_query(query), entry).await;
    }
}

/// Timetable client with a station search cache.
pub struct CachedIpClient {
    client: IpClient,
    cache: StationSearchCache,
}

impl CachedIpClient {
    /// Create a new cached client.
    pub fn new(client: IpClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: StationSearchCache::new(cache_config),
        }
    }
}

impl TimetableSource for CachedIpClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, IpError> {
        if let Some(cached) = self.cache.get(query).await {
            debug!(query, "station search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let stations = self.client.search_stations(query).await?;
        // Failures are not cached, so the next keystroke retries.
        self.cache.insert(query, Arc::new(stations.clone())).await;
        Ok(stations)
    }

    async fn timetable(&self, request: &TimetableRequest) -> Result<Vec<Departure>, IpError> {
        self.client.get_timetable(request).await
    }

    async fn train_information(
        &self,
        train_id: TrainId,
        date: NaiveDate,
    ) -> Result<Option<TrainInformation>, IpError> {
        self.client.get_train_information(train_id, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::IpConfig;

    #[test]
    fn query_normalisation() {
        assert_eq!(normalize_query("  Lisboa "), "lisboa");
        assert_eq!(normalize_query("SANTA APOLÓNIA"), "santa apolónia");
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 500);
    }

    #[tokio::test]
    async fn entries_shared_across_spellings() {
        let cache = StationSearchCache::new(&CacheConfig::default());
        assert!(cache.get("lisboa").await.is_none());

        let stations = vec![Station::new(9430007, "Lisboa - Oriente", 0.0)];
        cache.insert("Lisboa ", Arc::new(stations.clone())).await;

        let hit = cache.get("LISBOA").await.unwrap();
        assert_eq!(hit.as_ref(), &stations);
        assert!(cache.get("lisbon").await.is_none());
    }

    #[tokio::test]
    async fn cached_search_skips_network() {
        // Nothing listens on the discard port; a real request would fail.
        let client = IpClient::new(IpConfig::new().with_base_url("http://127.0.0.1:9")).unwrap();
        let cached = CachedIpClient::new(client, &CacheConfig::default());

        let stations = vec![Station::new(9402006, "Porto - Campanhã", 0.0)];
        cached.cache.insert("porto", Arc::new(stations.clone())).await;

        let found = cached.search_stations("Porto").await.unwrap();
        assert_eq!(found, stations);
    }
}
