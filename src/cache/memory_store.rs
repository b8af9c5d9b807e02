use crate::cache::error::CacheError;
use crate::cache::{CacheKey, CacheStore, StoredEntry};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// In-process store, used in tests and by embedders that do not want disk state.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<CacheKey, StoredEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry with an explicit write time.
    pub fn insert_at(&self, key: CacheKey, blob: Vec<u8>, modified: SystemTime) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, StoredEntry { blob, modified });
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self, key: CacheKey) -> Result<Option<StoredEntry>, CacheError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned())
    }

    fn store(&self, key: CacheKey, blob: &[u8]) -> Result<(), CacheError> {
        self.insert_at(key, blob.to_vec(), SystemTime::now());
        Ok(())
    }
}
