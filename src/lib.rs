mod archive;
mod cache;
mod config;
mod error;
mod geocode;
pub mod http;
mod metrics;
mod solar_duration;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use config::SolarConfig;
pub use error::SolarError;
pub use solar_duration::*;

pub use types::geocode_result::GeocodeResult;
pub use types::lat_lon::{Coordinates, LatLon};
pub use types::solar_result::*;

pub use archive::fetcher::{history_window, ArchiveDaily, ArchiveFetcher, DEFAULT_ARCHIVE_URL};
pub use geocode::client::{GeocodeClient, DEFAULT_GEOCODING_URL};

pub use cache::{
    is_fresh, CacheKey, CacheStore, FileCacheStore, MemoryCacheStore, SolarCache, StoredEntry,
    DEFAULT_CACHE_TTL,
};

pub use metrics::aggregator::{aggregate, RECENT_DAYS, RECENT_MONTHS};
pub use metrics::deriver::*;

pub use archive::error::ArchiveError;
pub use cache::error::CacheError;
pub use geocode::error::GeocodeError;
pub use metrics::error::ProcessingError;
