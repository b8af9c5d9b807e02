use std::path::PathBuf;
use thiserror::Error;

/// Failures inside the cache. These never reach callers of the solar pipeline:
/// read errors become misses and write errors are logged.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data")]
    CacheDecode(#[source] serde_json::Error),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] serde_json::Error),

    #[error("Cache I/O task failed")]
    CacheTask(#[from] tokio::task::JoinError),
}
