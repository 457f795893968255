//! In-memory secret storage

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{SecretStore, StorageError};

/// Process-local [`SecretStore`].
///
/// Clones share the same map, so a test can hand one clone to a token
/// manager and inspect persisted keys through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether a value exists under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl SecretStore for MemoryStore {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, StorageError> {
        self.entries.lock().get(key).cloned().ok_or(StorageError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
