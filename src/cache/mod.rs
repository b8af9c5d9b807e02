//! Coordinate-keyed result cache with lazy, read-time expiry.
//!
//! [`CacheStore`] is the raw key/blob interface; [`FileCacheStore`] keeps one file
//! per key on disk and [`MemoryCacheStore`] keeps everything in process.
//! [`SolarCache`] sits on top and deals in [`crate::SolarResult`]s.

pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod solar_cache;

use crate::cache::error::CacheError;
use crate::types::lat_lon::LatLon;
use crate::utils::round_to;
use std::fmt;
use std::time::{Duration, SystemTime};

pub use file_store::FileCacheStore;
pub use memory_store::MemoryCacheStore;
pub use solar_cache::SolarCache;

/// Entries older than this are treated as absent.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const KEY_DECIMALS: usize = 4;
const KEY_SCALE: f64 = 10_000.0;

/// A coordinate rounded to 4 decimal places (~11 m).
///
/// Rounding applies to the stored `f64`, ties to even, so a halfway input such as
/// `53.60595` (stored just below the tie) keys as `53.6059`. Coordinates that
/// round to the same key share a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lng_e4: i64,
}

impl CacheKey {
    pub fn latitude(self) -> f64 {
        self.lat_e4 as f64 / KEY_SCALE
    }

    pub fn longitude(self) -> f64 {
        self.lng_e4 as f64 / KEY_SCALE
    }

    /// File name of the entry, e.g. `solar_data_13.7563_100.5018.json`.
    pub fn file_name(self) -> String {
        format!("solar_data_{:?}_{:?}.json", self.latitude(), self.longitude())
    }
}

impl From<LatLon> for CacheKey {
    fn from(location: LatLon) -> Self {
        let scaled = |value: f64| (round_to(value, KEY_DECIMALS) * KEY_SCALE).round() as i64;
        CacheKey {
            lat_e4: scaled(location.0),
            lng_e4: scaled(location.1),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.latitude(), self.longitude())
    }
}

/// A stored blob and the time it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub blob: Vec<u8>,
    pub modified: SystemTime,
}

/// Raw key/blob storage behind [`SolarCache`].
///
/// Writes replace the whole entry. Concurrent writers to one key are not
/// coordinated; the last write wins.
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` when no entry exists for `key`.
    fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError>;

    fn store(&self, key: CacheKey, blob: &[u8]) -> Result<(), CacheError>;
}

/// Whether an entry written at `modified` is still valid at `now`.
///
/// A modification time in the future counts as age zero.
pub fn is_fresh(now: SystemTime, modified: SystemTime, ttl: Duration) -> bool {
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    age < ttl
}
