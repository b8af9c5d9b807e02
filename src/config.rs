use crate::archive::fetcher::DEFAULT_ARCHIVE_URL;
use crate::cache::DEFAULT_CACHE_TTL;
use crate::geocode::client::DEFAULT_GEOCODING_URL;
use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for a [`crate::SolarDuration`] client.
///
/// Every field has a default, so `SolarConfig::builder().build()` matches the
/// public Open-Meteo endpoints with a 90-day window and a 24 hour cache.
///
/// # Examples
///
/// ```
/// use solar_duration::SolarConfig;
/// use std::time::Duration;
///
/// let config = SolarConfig::builder()
///     .history_days(60)
///     .cache_ttl(Duration::from_secs(6 * 60 * 60))
///     .build();
/// assert_eq!(config.history_days, 60);
/// assert_eq!(config.archive_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SolarConfig {
    #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())]
    pub archive_url: String,

    #[builder(into, default = DEFAULT_GEOCODING_URL.to_string())]
    pub geocoding_url: String,

    #[builder(default = Duration::from_secs(30))]
    pub archive_timeout: Duration,

    #[builder(default = Duration::from_secs(10))]
    pub geocoding_timeout: Duration,

    /// Days of history requested, ending today.
    #[builder(default = 90)]
    pub history_days: u32,

    #[builder(default = DEFAULT_CACHE_TTL)]
    pub cache_ttl: Duration,

    /// Results requested per geocoding search.
    #[builder(default = 10)]
    pub geocode_count: u32,

    #[builder(into, default = "en".to_string())]
    pub geocode_language: String,

    /// Cache directory; the OS cache directory when unset.
    #[builder(into)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
