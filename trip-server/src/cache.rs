//! Caching layer for directions lookups.
//!
//! Place resolutions are keyed by the normalised query text. Driving paths
//! are keyed by the origin and destination rounded to five decimal places
//! (about a metre), so repeated searches between the same places share an
//! entry. Failed lookups are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::directions::{DirectionsBackend, DirectionsError};
use crate::domain::{DrivingPath, Location, Region};

/// Cache key for driving paths: origin and destination in 1e-5 degrees.
type PathKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = n;
        self
    }
}

/// Cache for directions responses.
pub struct DirectionsCache {
    places: MokaCache<String, Arc<Location>>,
    paths: MokaCache<PathKey, Arc<DrivingPath>>,
}

impl DirectionsCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let places = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { places, paths }
    }

    /// Lowercased with runs of whitespace collapsed.
    fn place_key(query: &str) -> String {
        query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn path_key(origin: &Location, destination: &Location) -> PathKey {
        let round = |deg: f64| (deg * 1e5).round() as i64;
        (
            round(origin.latitude),
            round(origin.longitude),
            round(destination.latitude),
            round(destination.longitude),
        )
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.places.entry_count() + self.paths.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.places.invalidate_all();
        self.paths.invalidate_all();
    }
}

/// Directions backend with caching.
///
/// Also owns the served region, so callers only pass the query text.
pub struct CachedDirections {
    backend: DirectionsBackend,
    region: Region,
    cache: DirectionsCache,
}

impl CachedDirections {
    /// Create a new cached backend.
    pub fn new(backend: DirectionsBackend, region: Region, cache_config: &CacheConfig) -> Self {
        Self {
            backend,
            region,
            cache: DirectionsCache::new(cache_config),
        }
    }

    /// Resolve a place inside the region, using cache if available.
    pub async fn resolve_place(&self, query: &str) -> Result<Arc<Location>, DirectionsError> {
        let key = DirectionsCache::place_key(query);

        if let Some(cached) = self.cache.places.get(&key).await {
            debug!(query = %key, "place cache hit");
            return Ok(cached);
        }

        let location = Arc::new(self.backend.resolve_place(query, &self.region).await?);
        self.cache.places.insert(key, location.clone()).await;

        Ok(location)
    }

    /// Fetch the driving path between two places, using cache if available.
    pub async fn compute_driving_path(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Arc<DrivingPath>, DirectionsError> {
        let key = DirectionsCache::path_key(origin, destination);

        if let Some(cached) = self.cache.paths.get(&key).await {
            debug!("path cache hit");
            return Ok(cached);
        }

        let path = Arc::new(
            self.backend
                .compute_driving_path(origin, destination)
                .await?,
        );
        self.cache.paths.insert(key, path.clone()).await;

        Ok(path)
    }

    /// Access the underlying backend for operations that bypass cache.
    pub fn backend(&self) -> &DirectionsBackend {
        &self.backend
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::{MockDirectionsClient, MockPlace};
    use crate::domain::{BoundingBox, Coordinate, CountryCode};

    fn region() -> Region {
        Region {
            name: "Fort Lauderdale".into(),
            bounds: BoundingBox::new(26.2424, 26.0724, -80.0723, -80.2023).unwrap(),
            country: CountryCode::parse("us").unwrap(),
            center: Coordinate::new(26.1224, -80.1373).unwrap(),
            timezone: chrono_tz::America::New_York,
        }
    }

    fn cached() -> CachedDirections {
        let mock = MockDirectionsClient::new(vec![
            MockPlace {
                address: "Central Terminal".into(),
                lat: 26.1197,
                lng: -80.1456,
                aliases: vec![],
            },
            MockPlace {
                address: "Fort Lauderdale Beach".into(),
                lat: 26.1223,
                lng: -80.1036,
                aliases: vec![],
            },
        ]);
        CachedDirections::new(mock.into(), region(), &CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.max_capacity, 1000);

        let config = config.with_ttl(Duration::from_secs(5)).with_max_capacity(10);
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.max_capacity, 10);
    }

    #[test]
    fn place_key_normalises_text() {
        assert_eq!(
            DirectionsCache::place_key("  Central   TERMINAL "),
            "central terminal"
        );
    }

    #[test]
    fn path_key_rounds_to_five_places() {
        let a = Location::new(Coordinate::new(26.119701, -80.145601).unwrap(), "a");
        let b = Location::new(Coordinate::new(26.119699, -80.145599).unwrap(), "b");
        let c = Location::new(Coordinate::new(26.1223, -80.1036).unwrap(), "c");

        assert_eq!(
            DirectionsCache::path_key(&a, &c),
            DirectionsCache::path_key(&b, &c)
        );
        assert_ne!(
            DirectionsCache::path_key(&a, &c),
            DirectionsCache::path_key(&c, &a)
        );
    }

    #[test]
    fn cache_creation() {
        let cache = DirectionsCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn resolved_places_are_cached() {
        let directions = cached();
        let first = directions.resolve_place("central terminal").await.unwrap();

        let key = DirectionsCache::place_key("Central Terminal");
        let hit = directions.cache.places.get(&key).await.unwrap();
        assert!(Arc::ptr_eq(&first, &hit));

        let second = directions.resolve_place(" CENTRAL terminal").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let directions = cached();
        assert!(directions.resolve_place("atlantis").await.is_err());

        let key = DirectionsCache::place_key("atlantis");
        assert!(directions.cache.places.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn paths_are_cached() {
        let directions = cached();
        let from = directions.resolve_place("Central Terminal").await.unwrap();
        let to = directions.resolve_place("Fort Lauderdale Beach").await.unwrap();

        let first = directions.compute_driving_path(&from, &to).await.unwrap();
        let second = directions.compute_driving_path(&from, &to).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        directions.cache.places.run_pending_tasks().await;
        directions.cache.paths.run_pending_tasks().await;
        assert_eq!(directions.cache_entry_count(), 3);

        directions.invalidate_cache();
        let third = directions.compute_driving_path(&from, &to).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
