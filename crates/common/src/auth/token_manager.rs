//! Token manager
//!
//! Manages the bearer token lifecycle:
//! - Loading the persisted session at start-up
//! - Serving the token only while it is authenticated (expiry + grace)
//! - Persisting every save and clear to the [`SecretStore`]
//! - Refreshing through an injected [`TokenRefresher`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::traits::TokenRefresher;
use super::types::{Session, AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRES_AT_KEY};
use crate::storage::{SecretStore, StorageError};
use crate::time::wire_date::{self, WireDateError};

/// Error type for token manager operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Expiry string did not parse
    #[error("Invalid token expiry: {0}")]
    InvalidExpiry(#[from] WireDateError),

    /// Persisting the session failed
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    /// No session held
    #[error("Not authenticated (no tokens)")]
    NotAuthenticated,

    /// The session has no refresh token
    #[error("No refresh token available")]
    NoRefreshToken,

    /// No refresher was configured
    #[error("Token refresh is not configured")]
    NoRefresher,

    /// The refresh exchange failed
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Keys written by [`TokenManager::store_session`], in write order
const SESSION_KEYS: [&str; 3] = [AUTH_TOKEN_KEY, TOKEN_EXPIRES_AT_KEY, REFRESH_TOKEN_KEY];

/// Single source of truth for the bearer token.
///
/// Session state lives behind one `RwLock`, so readers never observe a token
/// paired with another token's expiry. Writers persist to the store while
/// holding the write lock, which keeps storage and memory in the same order
/// of updates.
pub struct TokenManager {
    store: Arc<dyn SecretStore>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    session: RwLock<Option<Session>>,
    refresh_gate: Mutex<()>,
    generation: AtomicU64,
}

impl TokenManager {
    /// Create an empty token manager persisting to `store`
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            refresher: None,
            session: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Attach the refresher used by [`TokenManager::refresh`]
    #[must_use]
    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Load the persisted session
    ///
    /// Should be called on start-up. A session whose stored expiry is missing
    /// or malformed is discarded (and removed from storage) rather than
    /// trusted.
    ///
    /// # Returns
    /// `true` if a session was loaded, even one that has since expired (its
    /// refresh token may still be usable)
    ///
    /// # Errors
    /// Returns `TokenError::Storage` if the store cannot be read
    pub async fn initialize(&self) -> Result<bool, TokenError> {
        let Some(token) = self.store.find_secret(AUTH_TOKEN_KEY)? else {
            debug!("No persisted session found");
            return Ok(false);
        };

        let expires_at = match self.store.find_secret(TOKEN_EXPIRES_AT_KEY)? {
            Some(raw) => match wire_date::parse(&raw) {
                Ok(expires_at) => expires_at,
                Err(e) => {
                    warn!(error = %e, "Discarding persisted session with malformed expiry");
                    self.clear().await;
                    return Ok(false);
                }
            },
            None => {
                warn!("Discarding persisted session without expiry");
                self.clear().await;
                return Ok(false);
            }
        };

        let refresh_token = self.store.find_secret(REFRESH_TOKEN_KEY)?;
        let session = Session::new(token, refresh_token, expires_at);
        let authenticated = session.is_authenticated();

        *self.session.write().await = Some(session);
        self.generation.fetch_add(1, Ordering::AcqRel);

        info!(authenticated, "Token manager initialized with persisted session");
        Ok(true)
    }

    /// Current bearer token, only while authenticated
    ///
    /// Never returns an expired token; callers that need the session despite
    /// expiry use [`TokenManager::session`].
    pub async fn token(&self) -> Option<String> {
        let session = self.session.read().await;
        session.as_ref().filter(|s| s.is_authenticated()).map(|s| s.token.clone())
    }

    /// Whether a token is held and within expiry plus grace
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.as_ref().is_some_and(Session::is_authenticated)
    }

    /// Snapshot of the held session, authenticated or not
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Seconds until the nominal expiry, or `None` without a session
    pub async fn seconds_until_expiry(&self) -> Option<i64> {
        self.session.read().await.as_ref().map(Session::seconds_until_expiry)
    }

    /// Save a bearer token with its wire-format expiry
    ///
    /// Replaces the whole session; any previous refresh token is dropped.
    ///
    /// # Errors
    /// - `TokenError::InvalidExpiry` if `expires_at` does not parse (state is
    ///   left untouched)
    /// - `TokenError::Storage` if persisting fails
    pub async fn save_token(&self, token: &str, expires_at: &str) -> Result<(), TokenError> {
        self.save_authentication(token, None, expires_at).await
    }

    /// Save a bearer token, optional refresh token and wire-format expiry
    ///
    /// # Errors
    /// - `TokenError::InvalidExpiry` if `expires_at` does not parse (state is
    ///   left untouched)
    /// - `TokenError::Storage` if persisting fails
    pub async fn save_authentication(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        expires_at: &str,
    ) -> Result<(), TokenError> {
        let expires_at = wire_date::parse(expires_at)?;
        self.store_session(Session::new(token, refresh_token.map(str::to_string), expires_at))
            .await
    }

    /// Persist and install a session
    ///
    /// # Errors
    /// Returns `TokenError::Storage` if persisting fails. Entries already
    /// written are restored to their previous values and the in-memory
    /// session is left as it was.
    pub async fn store_session(&self, session: Session) -> Result<(), TokenError> {
        let mut current = self.session.write().await;

        let previous = self.snapshot()?;
        if let Err(e) = self.persist(&session) {
            warn!(error = %e, "Failed to persist session, restoring previous entries");
            self.restore(&previous);
            return Err(e.into());
        }

        debug!(expires_at = %session.expires_at, "Session stored");
        *current = Some(session);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<(&'static str, Option<String>)>, StorageError> {
        SESSION_KEYS.iter().map(|&key| Ok((key, self.store.find_secret(key)?))).collect()
    }

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        self.store.set_secret(AUTH_TOKEN_KEY, &session.token)?;
        self.store.set_secret(TOKEN_EXPIRES_AT_KEY, &wire_date::format(&session.expires_at))?;
        match session.refresh_token.as_deref() {
            Some(refresh_token) => self.store.set_secret(REFRESH_TOKEN_KEY, refresh_token),
            None => self.store.delete_secret(REFRESH_TOKEN_KEY),
        }
    }

    fn restore(&self, snapshot: &[(&'static str, Option<String>)]) {
        for (key, value) in snapshot {
            let result = match value {
                Some(value) => self.store.set_secret(key, value),
                None => self.store.delete_secret(key),
            };
            if let Err(e) = result {
                warn!(key = *key, error = %e, "Failed to restore persisted token entry");
            }
        }
    }

    /// Clear the session from memory and storage (logout)
    ///
    /// Idempotent and infallible: storage failures are logged, and the
    /// in-memory session is cleared regardless.
    pub async fn clear(&self) {
        let mut current = self.session.write().await;

        for key in [AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRES_AT_KEY] {
            if let Err(e) = self.store.delete_secret(key) {
                warn!(key, error = %e, "Failed to remove persisted token entry");
            }
        }

        if current.take().is_some() {
            info!("Tokens cleared (logged out)");
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Obtain a new bearer token through the configured refresher
    ///
    /// Refreshes are serialized. A caller that waited while another caller
    /// refreshed reuses that result instead of exchanging the refresh token
    /// a second time.
    ///
    /// # Errors
    /// - `TokenError::NoRefresher` without a configured refresher
    /// - `TokenError::NotAuthenticated` without a session
    /// - `TokenError::NoRefreshToken` if the session has no refresh token
    /// - `TokenError::RefreshFailed` / `Storage` from the exchange and save
    pub async fn refresh(&self) -> Result<String, TokenError> {
        let observed = self.generation.load(Ordering::Acquire);
        let _gate = self.refresh_gate.lock().await;

        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(token) = self.token().await {
                debug!("Reusing token refreshed by a concurrent caller");
                return Ok(token);
            }
        }

        self.exchange().await
    }

    /// Obtain a new bearer token after the server rejected `rejected`
    ///
    /// When the held session already carries a different, usable token
    /// (another caller refreshed after `rejected` was read), that token is
    /// returned without exchanging the refresh token again.
    ///
    /// # Errors
    /// As [`TokenManager::refresh`]
    pub async fn refresh_rejected(&self, rejected: &str) -> Result<String, TokenError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(token) = self.token().await.filter(|token| token != rejected) {
            debug!("Session moved past the rejected token, skipping exchange");
            return Ok(token);
        }

        self.exchange().await
    }

    /// Exchange the stored refresh token; the caller holds the refresh gate
    async fn exchange(&self) -> Result<String, TokenError> {
        let refresher = self.refresher.as_ref().ok_or(TokenError::NoRefresher)?;

        let refresh_token = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(s) => s.refresh_token.clone().ok_or(TokenError::NoRefreshToken)?,
                None => return Err(TokenError::NotAuthenticated),
            }
        };

        let grant = refresher.refresh(&refresh_token).await?;
        let next_refresh = grant.refresh_token.unwrap_or(refresh_token);
        self.store_session(Session::new(grant.token.clone(), Some(next_refresh), grant.expires_at))
            .await?;

        info!("Successfully refreshed access token");
        Ok(grant.token)
    }
}
