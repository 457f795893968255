//! Bearer token lifecycle
//!
//! One [`TokenManager`] per running application holds the current bearer
//! token, its refresh token and expiry. It is constructed once by the
//! composition root and shared by reference with the network client and the
//! auth feature; there is no global instance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  RwLock<Option<Session>> + refresh gate
//! └────────┬────────┘
//!          │
//!          ├──► SecretStore     (keychain / memory persistence)
//!          └──► TokenRefresher  (refresh-token exchange, optional)
//! ```
//!
//! # Usage Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use beautywiki_common::auth::TokenManager;
//! use beautywiki_common::storage::MemoryStore;
//!
//! # tokio_test_block_on(async {
//! let manager = TokenManager::new(Arc::new(MemoryStore::new()));
//! manager.save_token("abc123", "2099-01-01 00:00:00").await.unwrap();
//! assert_eq!(manager.token().await.as_deref(), Some("abc123"));
//!
//! manager.clear().await;
//! assert!(manager.token().await.is_none());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Persistence
//!
//! Three fixed keys, written on every save and removed together on clear:
//! [`AUTH_TOKEN_KEY`], [`REFRESH_TOKEN_KEY`], [`TOKEN_EXPIRES_AT_KEY`]. The
//! expiry is stored in the backend's wire format so it round-trips exactly.

pub mod token_manager;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use token_manager::{TokenError, TokenManager};
pub use traits::TokenRefresher;
pub use types::{
    Session, TokenGrant, AUTH_TOKEN_KEY, EXPIRY_GRACE_SECONDS, REFRESH_TOKEN_KEY,
    TOKEN_EXPIRES_AT_KEY,
};
