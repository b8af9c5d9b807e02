use crate::cache::error::CacheError;
use crate::cache::{is_fresh, CacheKey, CacheStore, StoredEntry};
use crate::types::lat_lon::LatLon;
use crate::types::solar_result::SolarResult;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Typed, expiring view over a [`CacheStore`].
///
/// Nothing here returns an error: unreadable, expired or corrupt entries are
/// misses, and failed writes are logged and dropped. Expired entries are left in
/// place until the next successful write replaces them.
///
/// Store calls run on tokio's blocking pool.
pub struct SolarCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SolarCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, location: LatLon) -> Option<SolarResult> {
        self.get_at(location, SystemTime::now()).await
    }

    /// Like [`SolarCache::get`], evaluating freshness at `now`.
    pub async fn get_at(&self, location: LatLon, now: SystemTime) -> Option<SolarResult> {
        let key = CacheKey::from(location);
        let entry = match self.load(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                info!("No cache found for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Error reading cache for {}: {}", key, e);
                return None;
            }
        };

        if !is_fresh(now, entry.modified, self.ttl) {
            info!("Cache expired for {}", key);
            return None;
        }

        match serde_json::from_slice::<SolarResult>(&entry.blob).map_err(CacheError::CacheDecode) {
            Ok(result) => {
                info!("Using cached data for {}", key);
                Some(result)
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn put(&self, location: LatLon, result: &SolarResult) {
        let key = CacheKey::from(location);
        match self.store_blob(key, result).await {
            Ok(()) => info!("Data cached for {}", key),
            Err(e) => warn!("Error caching data for {}: {}", key, e),
        }
    }

    async fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.load(key)).await?
    }

    async fn store_blob(&self, key: CacheKey, result: &SolarResult) -> Result<(), CacheError> {
        let blob = serde_json::to_vec(result).map_err(CacheError::CacheEncode)?;
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.store(key, &blob)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileCacheStore, MemoryCacheStore, DEFAULT_CACHE_TTL};
    use crate::types::lat_lon::Coordinates;
    use crate::types::solar_result::{BucketSummary, DateRange, DerivedDailyMetric};
    use chrono::NaiveDate;
    use std::fs::File;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    fn sample_result(location: LatLon) -> SolarResult {
        SolarResult {
            coordinates: Coordinates::from(location),
            daily: vec![DerivedDailyMetric {
                date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                sunlight_hours: 9.0,
                ghi: 5.0,
                pvout: 4.0,
            }],
            monthly: vec![BucketSummary {
                label: "Mar 2024".to_string(),
                sunlight_hours: 9.0,
                ghi: 5.0,
                pvout: 4.0,
            }],
            yearly: vec![BucketSummary {
                label: "2024".to_string(),
                sunlight_hours: 9.0,
                ghi: 5.0,
                pvout: 4.0,
            }],
            date_range: DateRange {
                start: "2024-03-03".to_string(),
                end: "2024-03-03".to_string(),
                current_date: "2024-03-04".to_string(),
            },
        }
    }

    struct FailingStore;

    impl CacheStore for FailingStore {
        fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError> {
            Err(CacheError::CacheRead(
                key.file_name().into(),
                std::io::Error::other("disk on fire"),
            ))
        }

        fn store(&self, key: CacheKey, _blob: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::CacheWrite(
                key.file_name().into(),
                std::io::Error::other("disk on fire"),
            ))
        }
    }

    /// Records the thread every store call runs on.
    #[derive(Default)]
    struct ThreadRecordingStore {
        inner: MemoryCacheStore,
        threads: Mutex<Vec<ThreadId>>,
    }

    impl CacheStore for ThreadRecordingStore {
        fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError> {
            self.threads.lock().unwrap().push(thread::current().id());
            self.inner.load(key)
        }

        fn store(&self, key: CacheKey, blob: &[u8]) -> Result<(), CacheError> {
            self.threads.lock().unwrap().push(thread::current().id());
            self.inner.store(key, blob)
        }
    }

    #[tokio::test]
    async fn store_calls_run_off_the_runtime_thread() {
        let store = Arc::new(ThreadRecordingStore::default());
        let cache = SolarCache::new(store.clone(), DEFAULT_CACHE_TTL);
        let location = LatLon(13.7563, 100.5018);
        let result = sample_result(location);

        cache.put(location, &result).await;
        assert_eq!(cache.get(location).await, Some(result));

        let runtime_thread = thread::current().id();
        let threads = store.threads.lock().unwrap();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|id| *id != runtime_thread));
    }

    #[tokio::test]
    async fn custom_ttl_is_honoured() {
        let ttl = Duration::from_secs(60);
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SolarCache::new(store.clone(), ttl);
        assert_eq!(cache.ttl(), ttl);

        let location = LatLon(1.0, 2.0);
        let result = sample_result(location);
        let written = SystemTime::now();
        store.insert_at(
            CacheKey::from(location),
            serde_json::to_vec(&result).unwrap(),
            written,
        );
        assert_eq!(
            cache.get_at(location, written + Duration::from_secs(59)).await,
            Some(result)
        );
        assert_eq!(cache.get_at(location, written + ttl).await, None);
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let cache = SolarCache::new(Arc::new(MemoryCacheStore::new()), DEFAULT_CACHE_TTL);
        let location = LatLon(13.7563, 100.5018);
        let result = sample_result(location);

        cache.put(location, &result).await;
        assert_eq!(cache.get(location).await, Some(result));
    }

    #[tokio::test]
    async fn miss_when_nothing_stored() {
        let cache = SolarCache::new(Arc::new(MemoryCacheStore::new()), DEFAULT_CACHE_TTL);
        assert_eq!(cache.get(LatLon(1.0, 1.0)).await, None);
    }

    #[tokio::test]
    async fn colliding_coordinates_hit_the_same_entry() {
        let cache = SolarCache::new(Arc::new(MemoryCacheStore::new()), DEFAULT_CACHE_TTL);
        let first = LatLon(13.75634, 100.50181);
        let result = sample_result(first);

        cache.put(first, &result).await;
        // The stored coordinates are those of the request that filled the entry.
        assert_eq!(cache.get(LatLon(13.75631, 100.50179)).await, Some(result));
    }

    #[tokio::test]
    async fn expires_at_ttl_boundary_without_deleting() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SolarCache::new(store.clone(), DEFAULT_CACHE_TTL);
        let location = LatLon(13.7563, 100.5018);
        let result = sample_result(location);
        let written = SystemTime::now();
        store.insert_at(
            CacheKey::from(location),
            serde_json::to_vec(&result).unwrap(),
            written,
        );

        let just_before = written + DEFAULT_CACHE_TTL - Duration::from_secs(1);
        assert_eq!(cache.get_at(location, just_before).await, Some(result));
        assert_eq!(cache.get_at(location, written + DEFAULT_CACHE_TTL).await, None);
        assert_eq!(store.len(), 1, "expired entries are not evicted");
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SolarCache::new(store.clone(), DEFAULT_CACHE_TTL);
        let location = LatLon(5.0, 5.0);
        store.insert_at(
            CacheKey::from(location),
            b"{\"coordinates\": tru".to_vec(),
            SystemTime::now(),
        );
        assert_eq!(cache.get(location).await, None);
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let cache = SolarCache::new(Arc::new(FailingStore), DEFAULT_CACHE_TTL);
        let location = LatLon(5.0, 5.0);
        cache.put(location, &sample_result(location)).await;
        assert_eq!(cache.get(location).await, None);
    }

    #[tokio::test]
    async fn file_entries_expire_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        let path = store.path_for(CacheKey::from(LatLon(13.7563, 100.5018)));
        let cache = SolarCache::new(Arc::new(store), DEFAULT_CACHE_TTL);
        let location = LatLon(13.7563, 100.5018);
        let result = sample_result(location);

        cache.put(location, &result).await;
        assert_eq!(cache.get(location).await, Some(result.clone()));

        let stale = SystemTime::now() - DEFAULT_CACHE_TTL - Duration::from_secs(5);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(stale)
            .unwrap();
        assert_eq!(cache.get(location).await, None);
        assert!(path.is_file());

        // A fresh write brings it back.
        cache.put(location, &result).await;
        assert_eq!(cache.get(location).await, Some(result));
    }
}
