//! This module provides the main entry point: a client that turns a coordinate into
//! a [`SolarResult`] (consulting the cache first) and searches places by name.

use crate::archive::fetcher::{history_window, ArchiveFetcher};
use crate::cache::{CacheStore, FileCacheStore, SolarCache};
use crate::config::SolarConfig;
use crate::error::SolarError;
use crate::metrics::aggregator::aggregate;
use crate::metrics::deriver::{derive_daily_metrics, records_from_archive};
use crate::geocode::client::GeocodeClient;
use crate::types::geocode_result::GeocodeResult;
use crate::types::lat_lon::LatLon;
use crate::types::solar_result::SolarResult;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// The main client for solar data.
///
/// Create an instance using [`SolarDuration::new()`] for the defaults (public
/// Open-Meteo endpoints, cache in the system cache directory),
/// [`SolarDuration::with_config()`] for custom settings, or
/// [`SolarDuration::with_store()`] to supply the cache backend yourself.
///
/// # Examples
///
/// ```no_run
/// # use solar_duration::{LatLon, SolarDuration, SolarError};
/// # async fn run() -> Result<(), SolarError> {
/// let client = SolarDuration::new().await?;
/// let result = client
///     .solar_data()
///     .location(LatLon(13.7563, 100.5018))
///     .call()
///     .await?;
/// println!("{} days, {} months", result.daily.len(), result.monthly.len());
/// # Ok(())
/// # }
/// ```
pub struct SolarDuration {
    archive: ArchiveFetcher,
    geocoder: GeocodeClient,
    cache: SolarCache,
    config: SolarConfig,
}

#[bon]
impl SolarDuration {
    /// Creates a client with [`SolarConfig::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`SolarError::CacheDirResolution`] if the system cache directory cannot
    /// be determined and [`SolarError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, SolarError> {
        Self::with_config(SolarConfig::default()).await
    }

    /// Creates a client with default settings and the given cache directory.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, SolarError> {
        Self::with_config(SolarConfig::builder().cache_dir(cache_folder).build()).await
    }

    /// Creates a client with a file cache in `config.cache_dir`, or in the system
    /// cache directory when that is unset. The directory is created if missing.
    pub async fn with_config(config: SolarConfig) -> Result<Self, SolarError> {
        let cache_folder = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => get_cache_dir().map_err(SolarError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| SolarError::CacheDirCreation(cache_folder.clone(), e))?;
        let store = FileCacheStore::new(&cache_folder);
        Self::with_store(config, store)
    }

    /// Creates a client backed by an arbitrary [`CacheStore`].
    /// `config.cache_dir` is ignored.
    pub fn with_store(
        config: SolarConfig,
        store: impl CacheStore + 'static,
    ) -> Result<Self, SolarError> {
        Ok(Self {
            archive: ArchiveFetcher::new(config.archive_url.clone(), config.archive_timeout)?,
            geocoder: GeocodeClient::new(
                config.geocoding_url.clone(),
                config.geocoding_timeout,
                config.geocode_language.clone(),
            )?,
            cache: SolarCache::new(Arc::new(store), config.cache_ttl),
            config,
        })
    }

    pub fn config(&self) -> &SolarConfig {
        &self.config
    }

    /// Solar metrics for a coordinate.
    ///
    /// Returns the cached result when a fresh one exists for the rounded coordinate.
    /// Otherwise fetches `history_days` of archive data ending today, derives the
    /// daily metrics, aggregates them and caches the result before returning it.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The coordinate to evaluate.
    /// * `.today(NaiveDate)`: Optional. The last day of the window and the reported
    ///   `current_date`. Defaults to the local date.
    ///
    /// # Errors
    ///
    /// * [`SolarError::InvalidInput`] for coordinates out of range. Nothing is fetched.
    /// * [`SolarError::Upstream`] when the archive request fails.
    /// * [`SolarError::Processing`] when the archive data cannot be aggregated.
    ///
    /// Cache failures are never returned.
    #[builder]
    pub async fn solar_data(
        &self,
        location: LatLon,
        today: Option<NaiveDate>,
    ) -> Result<SolarResult, SolarError> {
        let location = location.validate()?;

        if let Some(cached) = self.cache.get(location).await {
            return Ok(cached);
        }

        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let (start, end) = history_window(today, self.config.history_days);
        let daily = self
            .archive
            .fetch_daily(location, start, end)
            .await
            .inspect_err(|e| warn!("Archive fetch for {} failed: {}", location, e))?;

        let records = records_from_archive(&daily)?;
        let metrics = derive_daily_metrics(&records);
        info!(
            "Derived {} of {} days for {}",
            metrics.len(),
            daily.time.len(),
            location
        );
        let result = aggregate(location, metrics, today)?;

        self.cache.put(location, &result).await;
        Ok(result)
    }

    /// Searches places by name.
    ///
    /// # Arguments
    ///
    /// * `.query(&str)`: **Required.** Free-text place name.
    /// * `.count(u32)`: Optional. Maximum number of results; defaults to
    ///   `geocode_count` from the config.
    ///
    /// # Errors
    ///
    /// [`SolarError::InvalidInput`] for a blank query, [`SolarError::Geocode`] when the
    /// geocoding request fails.
    #[builder]
    pub async fn geocode(
        &self,
        query: &str,
        count: Option<u32>,
    ) -> Result<Vec<GeocodeResult>, SolarError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SolarError::InvalidInput(
                "Search query is required".to_string(),
            ));
        }
        let count = count.unwrap_or(self.config.geocode_count);
        Ok(self.geocoder.search(query, count).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::test_support::{spawn_mock, three_day_archive_body, MockUpstream};
    use axum::http::StatusCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn client_for(mock: &MockUpstream) -> Result<SolarDuration, SolarError> {
        let config = SolarConfig::builder()
            .archive_url(mock.base_url.clone())
            .geocoding_url(mock.base_url.clone())
            .build();
        SolarDuration::with_store(config, MemoryCacheStore::new())
    }

    #[tokio::test]
    async fn three_day_sample_end_to_end() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::OK, three_day_archive_body().to_string(), None).await;
        let client = client_for(&mock)?;

        let result = client
            .solar_data()
            .location(LatLon(13.7563, 100.5018))
            .today(today())
            .call()
            .await?;

        let dates: Vec<String> = result.daily.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-03-03", "2024-03-02", "2024-03-01"]);
        let ghi: Vec<f64> = result.daily.iter().map(|d| d.ghi).collect();
        assert_eq!(ghi, [5.0, 6.1, 5.6]);
        let sunlight: Vec<f64> = result.daily.iter().map(|d| d.sunlight_hours).collect();
        assert_eq!(sunlight, [9.0, 11.0, 10.0]);
        let pvout: Vec<f64> = result.daily.iter().map(|d| d.pvout).collect();
        assert_eq!(pvout, [4.0, 4.8, 4.4]);

        assert_eq!(result.monthly.len(), 1);
        assert_eq!(result.monthly[0].label, "Mar 2024");
        assert_eq!(result.monthly[0].sunlight_hours, 10.0);
        assert_eq!(result.yearly.len(), 1);
        assert_eq!(result.yearly[0].label, "2024");

        assert_eq!(result.date_range.start, "2024-03-03");
        assert_eq!(result.date_range.end, "2024-03-01");
        assert_eq!(result.date_range.current_date, "2024-03-04");

        let query = mock.last_query().unwrap_or_default();
        assert!(query.contains("start_date=2023-12-05"), "{query}");
        assert!(query.contains("end_date=2024-03-04"), "{query}");
        Ok(())
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::OK, three_day_archive_body().to_string(), None).await;
        let client = client_for(&mock)?;

        let first = client
            .solar_data()
            .location(LatLon(13.75634, 100.50181))
            .today(today())
            .call()
            .await?;
        let second = client
            .solar_data()
            .location(LatLon(13.75631, 100.50179))
            .today(today())
            .call()
            .await?;

        assert_eq!(first, second);
        assert_eq!(mock.hits(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_coordinate_makes_no_upstream_call() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::OK, three_day_archive_body().to_string(), None).await;
        let client = client_for(&mock)?;

        let err = client
            .solar_data()
            .location(LatLon(95.0, 100.0))
            .call()
            .await
            .unwrap_err();

        assert!(err.is_invalid_input(), "{err:?}");
        assert_eq!(mock.hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn upstream_failure_is_not_cached() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::SERVICE_UNAVAILABLE, "{}", None).await;
        let client = client_for(&mock)?;

        for _ in 0..2 {
            let err = client
                .solar_data()
                .location(LatLon(1.0, 1.0))
                .today(today())
                .call()
                .await
                .unwrap_err();
            assert!(matches!(err, SolarError::Upstream(_)), "{err:?}");
        }
        assert_eq!(mock.hits(), 2, "each failed request goes upstream again");
        Ok(())
    }

    #[tokio::test]
    async fn empty_archive_yields_unknown_range() -> Result<(), SolarError> {
        let body = serde_json::json!({"daily": {"time": []}});
        let mock = spawn_mock(StatusCode::OK, body.to_string(), None).await;
        let client = client_for(&mock)?;

        let result = client
            .solar_data()
            .location(LatLon(0.0, 0.0))
            .today(today())
            .call()
            .await?;
        assert!(result.daily.is_empty());
        assert_eq!(result.date_range.start, "unknown");
        assert_eq!(result.date_range.end, "unknown");
        Ok(())
    }

    #[tokio::test]
    async fn blank_geocode_query_is_invalid() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::OK, "{}", None).await;
        let client = client_for(&mock)?;

        let err = client.geocode().query("   ").call().await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(mock.hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn creates_cache_folder_and_writes_entry() -> Result<(), SolarError> {
        let mock = spawn_mock(StatusCode::OK, three_day_archive_body().to_string(), None).await;
        let root = tempfile::tempdir().unwrap();
        let cache_dir = root.path().join("cache");
        let config = SolarConfig::builder()
            .archive_url(mock.base_url.clone())
            .cache_dir(cache_dir.clone())
            .build();
        let client = SolarDuration::with_config(config).await?;

        client
            .solar_data()
            .location(LatLon(13.7563, 100.5018))
            .today(today())
            .call()
            .await?;

        assert!(cache_dir
            .join("solar_data_13.7563_100.5018.json")
            .is_file());
        Ok(())
    }
}
