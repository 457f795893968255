//! Foundation utilities shared across BeautyWiki crates.
//!
//! # Modules
//!
//! - [`utils`]: JSON key-case conversion and serde helpers
//! - [`time`]: the backend's wire date format (`yyyy-MM-dd HH:mm:ss`, UTC+8)
//! - [`storage`]: durable key-value secret storage (keychain or in-memory)
//! - [`auth`]: bearer token lifecycle ([`auth::TokenManager`])
//!
//! # Feature Tiers
//!
//! - default: everything except the system keychain backend
//! - `platform`: [`storage::KeychainStore`] backed by the `keyring` crate

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod storage;
pub mod time;
pub mod utils;

pub use auth::{Session, TokenError, TokenGrant, TokenManager, TokenRefresher};
pub use storage::{MemoryStore, SecretStore, StorageError};
#[cfg(feature = "platform")]
pub use storage::KeychainStore;
pub use time::wire_date::{WireDateError, WIRE_DATE_FORMAT, WIRE_TIMEZONE};
