//! Token access for the network client
//!
//! The client never talks to the token manager directly; it sees the
//! [`AccessTokenProvider`] trait, which keeps the retry policy testable with
//! scripted providers.

use async_trait::async_trait;
use beautywiki_common::auth::TokenManager;
use tracing::info;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Current bearer token, only while it is usable
    async fn access_token(&self) -> Option<String>;

    /// Obtain a new token after the server rejected `rejected`
    ///
    /// A provider whose session already moved past `rejected` (another
    /// caller refreshed in the meantime) may succeed without an exchange.
    ///
    /// # Errors
    /// Returns the reason the token could not be renewed
    async fn refresh_access_token(&self, rejected: &str) -> Result<(), ApiError>;

    /// Drop the session after an unrecoverable authentication failure
    async fn invalidate(&self);
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> Option<String> {
        self.token().await
    }

    async fn refresh_access_token(&self, rejected: &str) -> Result<(), ApiError> {
        self.refresh_rejected(rejected).await.map(|_| ()).map_err(ApiError::from)
    }

    async fn invalidate(&self) {
        info!("Invalidating session after authentication failure");
        self.clear().await;
    }
}

/// Provider without a session, for clients that only call public endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousTokenProvider;

#[async_trait]
impl AccessTokenProvider for AnonymousTokenProvider {
    async fn access_token(&self) -> Option<String> {
        None
    }

    async fn refresh_access_token(&self, _rejected: &str) -> Result<(), ApiError> {
        Err(ApiError::TokenMissing)
    }

    async fn invalidate(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use beautywiki_common::auth::Session;
    use beautywiki_common::storage::MemoryStore;
    use chrono::{Duration, Utc};

    use super::*;

    #[tokio::test]
    async fn test_token_manager_provider() {
        let manager = TokenManager::new(Arc::new(MemoryStore::new()));
        assert_eq!(manager.access_token().await, None);

        manager
            .store_session(Session::new("abc", None, Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        assert_eq!(manager.access_token().await.as_deref(), Some("abc"));

        manager.invalidate().await;
        assert_eq!(manager.access_token().await, None);
    }

    #[tokio::test]
    async fn test_refresh_without_refresher_is_unauthorized() {
        let manager = TokenManager::new(Arc::new(MemoryStore::new()));
        manager
            .store_session(Session::new("abc", Some("r".into()), Utc::now()))
            .await
            .unwrap();

        assert_eq!(manager.refresh_access_token("abc").await, Err(ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_anonymous_provider() {
        let provider = AnonymousTokenProvider;
        assert_eq!(provider.access_token().await, None);
        assert_eq!(provider.refresh_access_token("abc").await, Err(ApiError::TokenMissing));
    }
}
