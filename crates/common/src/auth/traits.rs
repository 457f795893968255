//! Traits for token refresh
//!
//! The refresh-token exchange is a network call owned by the auth feature;
//! the token manager only sees this trait, which keeps it free of HTTP code
//! and lets tests substitute a scripted refresher.

use async_trait::async_trait;

use super::token_manager::TokenError;
use super::types::TokenGrant;

/// Exchanges a refresh token for a new bearer token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Obtain new credentials using `refresh_token`
    ///
    /// # Errors
    /// Returns `TokenError::RefreshFailed` if the exchange is rejected or
    /// cannot be performed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError>;
}
