//! Keychain-backed secret storage
//!
//! Thin wrapper over the platform keychain (macOS Keychain Access, Windows
//! Credential Manager, Linux Secret Service). Every logical key becomes one
//! keychain entry under a shared service name.
//!
//! ## Usage
//!
//! ```no_run
//! use beautywiki_common::storage::{KeychainStore, SecretStore};
//!
//! let keychain = KeychainStore::new("BeautyWiki.session");
//! keychain.set_secret("auth_token", "abc123")?;
//! assert_eq!(keychain.get_secret("auth_token")?, "abc123");
//! # Ok::<(), beautywiki_common::storage::StorageError>(())
//! ```

use keyring::Entry;
use tracing::debug;

use super::{SecretStore, StorageError};

/// Platform keychain storage scoped to one service name
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service_name: String,
}

impl KeychainStore {
    /// Create a keychain store for a service (e.g., "BeautyWiki.session")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Service name entries are filed under
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn create_entry(&self, account: &str) -> Result<Entry, StorageError> {
        Entry::new(&self.service_name, account).map_err(|e| {
            StorageError::AccessFailed(format!("Failed to create keychain entry: {e}"))
        })
    }
}

impl SecretStore for KeychainStore {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        let entry = self.create_entry(key)?;
        entry.set_password(value).map_err(|e| {
            StorageError::AccessFailed(format!("Failed to store secret for {key}: {e}"))
        })
    }

    fn get_secret(&self, key: &str) -> Result<String, StorageError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        let entry = self.create_entry(key)?;
        entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                StorageError::NotFound
            } else {
                StorageError::AccessFailed(format!("Failed to retrieve secret for {key}: {e}"))
            }
        })
    }

    fn delete_secret(&self, key: &str) -> Result<(), StorageError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        let entry = self.create_entry(key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::AccessFailed(format!(
                "Failed to delete secret for {key}: {e}"
            ))),
        }
    }
}
