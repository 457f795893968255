//! Durable key-value storage for secrets
//!
//! The token manager persists the bearer token, refresh token and expiry
//! through the [`SecretStore`] trait so it never depends on a concrete
//! backend:
//!
//! - [`KeychainStore`] (feature `platform`): the platform keychain via
//!   `keyring` (macOS Keychain, Windows Credential Manager, Secret Service)
//! - [`MemoryStore`]: process-local map, used in tests and on hosts without a
//!   keychain

#[cfg(feature = "platform")]
pub mod keychain;
pub mod memory;

use thiserror::Error;

#[cfg(feature = "platform")]
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

/// Secret storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No value stored under the key
    #[error("Entry not found")]
    NotFound,

    /// Backend access failed (permission denied, not available, etc.)
    #[error("Secret storage access failed: {0}")]
    AccessFailed(String),
}

/// Key-value secret storage.
///
/// Implementations are synchronous: every backend in use completes in
/// microseconds and callers hold no async locks across these calls that
/// other tasks wait on for long.
pub trait SecretStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns `StorageError::AccessFailed` if the backend rejects the write
    fn set_secret(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read the value stored under `key`
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if nothing is stored under `key`
    fn get_secret(&self, key: &str) -> Result<String, StorageError>;

    /// Remove the value stored under `key` (idempotent)
    ///
    /// # Errors
    /// Returns `StorageError::AccessFailed` if the backend rejects the delete
    fn delete_secret(&self, key: &str) -> Result<(), StorageError>;

    /// Read an optional value, mapping `NotFound` to `None`
    ///
    /// # Errors
    /// Returns `StorageError::AccessFailed` on backend failure
    fn find_secret(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get_secret(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
