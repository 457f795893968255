//! Token types and persistence keys

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Storage key of the bearer token
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key of the token expiry (wire format string)
pub const TOKEN_EXPIRES_AT_KEY: &str = "token_expires_at";

/// Seconds past the nominal expiry during which a token is still used.
///
/// Requests started just before expiry, and clocks a few minutes ahead of
/// the server, must not lose their session.
pub const EXPIRY_GRACE_SECONDS: i64 = 300;

/// An authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token sent in the `Authorization` header
    pub token: String,

    /// Refresh token, when the backend issued one
    pub refresh_token: Option<String>,

    /// Nominal expiry reported by the backend
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self { token: token.into(), refresh_token, expires_at }
    }

    /// Whether the token is usable at `now` (expiry plus the grace window)
    #[must_use]
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at + Duration::seconds(EXPIRY_GRACE_SECONDS)
    }

    /// Whether the token is usable right now
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Seconds until the nominal expiry (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Credentials returned by a login or refresh exchange
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// New bearer token
    pub token: String,

    /// New refresh token; `None` keeps the current one
    pub refresh_token: Option<String>,

    /// Nominal expiry
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring(offset_seconds: i64) -> Session {
        Session::new("token", None, Utc::now() + Duration::seconds(offset_seconds))
    }

    #[test]
    fn test_session_within_grace_window_is_authenticated() {
        assert!(session_expiring(3600).is_authenticated());
        assert!(session_expiring(-100).is_authenticated());
    }

    #[test]
    fn test_session_past_grace_window_is_not_authenticated() {
        assert!(!session_expiring(-400).is_authenticated());
    }

    #[test]
    fn test_grace_boundary_is_exclusive() {
        let expires_at = Utc::now();
        let session = Session::new("token", None, expires_at);
        let boundary = expires_at + Duration::seconds(EXPIRY_GRACE_SECONDS);

        assert!(session.is_authenticated_at(boundary - Duration::seconds(1)));
        assert!(!session.is_authenticated_at(boundary));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let session = Session::new("secret-token", Some("secret-refresh".into()), Utc::now());
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
