use crate::cache::error::CacheError;
use crate::cache::{CacheKey, CacheStore, StoredEntry};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One JSON file per key in a flat directory. The file's mtime is the entry's age.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    /// The directory is expected to exist; see [`crate::utils::ensure_cache_dir_exists`].
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn path_for(&self, key: CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError> {
        let path = self.path_for(key);
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::CacheMetadataRead(path, e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::CacheMetadataRead(path.clone(), e))?;
        let blob = std::fs::read(&path).map_err(|e| CacheError::CacheRead(path, e))?;
        Ok(Some(StoredEntry { blob, modified }))
    }

    /// Writes to a temporary file in the cache directory and renames it over the
    /// entry, so readers see either the old or the new file.
    fn store(&self, key: CacheKey, blob: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let mut temp_file = NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .write_all(blob)
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .flush()
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::CacheWrite(path.clone(), e.error))?;
        Ok(())
    }
}
