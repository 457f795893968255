//! Account sign-in and session refresh
//!
//! [`AuthService`] is the only writer of a fresh session: login saves what
//! the backend issues, logout clears it. [`SessionRefresher`] is handed to
//! the token manager so an expired session can be renewed without the user.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use beautywiki_common::auth::{Session, TokenError, TokenGrant, TokenManager, TokenRefresher};
use beautywiki_domain::types::{LoginRequest, LoginResponse, RefreshRequest, UserProfile};
use beautywiki_domain::{ApiRequest, Endpoint, HttpMethod};
use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, NetworkClient};

/// `POST /api/user/login`
#[derive(Debug, Clone, Copy)]
pub struct LoginEndpoint;

impl Endpoint for LoginEndpoint {
    type Request = LoginRequest;
    type Response = LoginResponse;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/login")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
}

/// `POST /api/user/logout`
#[derive(Debug, Clone, Copy)]
pub struct LogoutEndpoint;

impl Endpoint for LogoutEndpoint {
    type Request = ();
    type Response = IgnoredAny;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/logout")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

/// `GET /api/user/profile`
#[derive(Debug, Clone, Copy)]
pub struct ProfileEndpoint;

impl Endpoint for ProfileEndpoint {
    type Request = ();
    type Response = UserProfile;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/profile")
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

/// `POST /api/user/refresh`
#[derive(Debug, Clone, Copy)]
pub struct RefreshEndpoint;

impl Endpoint for RefreshEndpoint {
    type Request = RefreshRequest;
    type Response = LoginResponse;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/refresh")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
}

/// Sign-in, sign-out and profile
#[derive(Clone)]
pub struct AuthService {
    client: NetworkClient,
    tokens: Arc<TokenManager>,
}

impl AuthService {
    pub fn new(client: NetworkClient, tokens: Arc<TokenManager>) -> Self {
        Self { client, tokens }
    }

    /// Sign in and persist the issued session
    ///
    /// # Errors
    /// - any `send` error (`Unauthorized` for rejected credentials)
    /// - `ApiError::Storage` if the session cannot be persisted
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserProfile>, ApiError> {
        let request = ApiRequest::new(LoginEndpoint).with_body(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        let response = self.client.send(&request).await?;

        let session = Session::new(response.token, response.refresh_token, response.expires_at);
        self.tokens.store_session(session).await?;

        info!(username, "Signed in");
        Ok(response.user)
    }

    /// Sign out
    ///
    /// The backend is told best-effort; local state is cleared whatever the
    /// outcome.
    pub async fn logout(&self) {
        if let Some(token) = self.tokens.token().await {
            let request = ApiRequest::new(LogoutEndpoint).with_auth_token(token);
            if let Err(e) = self.client.send(&request).await {
                warn!(error = %e, "Backend logout failed, clearing local session anyway");
            }
        }

        self.tokens.clear().await;
        info!("Signed out");
    }

    pub async fn is_logged_in(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Profile of the signed-in user
    ///
    /// # Errors
    /// `TokenMissing` when signed out, otherwise any `send` error
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.client.send(&ApiRequest::new(ProfileEndpoint)).await
    }
}

/// Renews a session through `POST /api/user/refresh`
///
/// Must use a client that does not itself depend on the token manager being
/// refreshed (an anonymous one sharing the transport).
pub struct SessionRefresher {
    client: NetworkClient,
}

impl SessionRefresher {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRefresher for SessionRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        let request = ApiRequest::new(RefreshEndpoint)
            .with_body(RefreshRequest { refresh_token: refresh_token.to_string() });

        let response = self.client.send(&request).await.map_err(|e| {
            warn!(error = %e, "Refresh exchange failed");
            TokenError::RefreshFailed(e.to_string())
        })?;

        Ok(TokenGrant {
            token: response.token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
        })
    }
}
