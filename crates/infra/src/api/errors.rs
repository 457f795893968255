//! API-specific error types
//!
//! Every failure of a request surfaces as one [`ApiError`]; feature services
//! branch on [`ApiError::category`] rather than on individual variants.

use beautywiki_common::auth::TokenError;
use beautywiki_domain::WikiError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// No usable credentials, or credentials rejected (401, 403)
    Authentication,
    /// Request-side problems reported by the server (404, other 4xx) or a
    /// malformed URL
    Client,
    /// Server errors (5xx)
    Server,
    /// Transport failures
    Network,
    /// Response body did not match the expected shape
    Decoding,
    /// Failures that never reached the network (encoding, cancellation,
    /// storage, configuration)
    Local,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No authentication token available")]
    TokenMissing,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected status code: {0}")]
    Unknown(u16),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::TokenMissing | Self::Unauthorized | Self::Forbidden => {
                ApiErrorCategory::Authentication
            }
            Self::InvalidUrl(_) | Self::NotFound => ApiErrorCategory::Client,
            Self::Unknown(code) if *code >= 500 => ApiErrorCategory::Server,
            Self::Unknown(_) => ApiErrorCategory::Client,
            Self::ServerError(_) => ApiErrorCategory::Server,
            Self::NetworkError(_) => ApiErrorCategory::Network,
            Self::DecodingError(_) => ApiErrorCategory::Decoding,
            Self::Encoding(_) | Self::Cancelled | Self::Storage(_) | Self::Config(_) => {
                ApiErrorCategory::Local
            }
        }
    }

    /// Whether the user has to sign in again
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::TokenMissing | Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkError(format!("request timed out: {err}"))
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidExpiry(e) => Self::DecodingError(e.to_string()),
            TokenError::Storage(e) => Self::Storage(e.to_string()),
            TokenError::NotAuthenticated | TokenError::NoRefreshToken => Self::TokenMissing,
            TokenError::NoRefresher | TokenError::RefreshFailed(_) => Self::Unauthorized,
        }
    }
}

impl From<ApiError> for WikiError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Config(message) | ApiError::InvalidUrl(message) => Self::Config(message),
            ApiError::Storage(message) => Self::Storage(message),
            other if other.category() == ApiErrorCategory::Authentication => {
                Self::Auth(other.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use beautywiki_common::storage::StorageError;

    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(ApiError::Unauthorized.category(), ApiErrorCategory::Authentication);
        assert_eq!(ApiError::TokenMissing.category(), ApiErrorCategory::Authentication);
        assert_eq!(ApiError::NotFound.category(), ApiErrorCategory::Client);
        assert_eq!(ApiError::Unknown(418).category(), ApiErrorCategory::Client);
        assert_eq!(ApiError::Unknown(502).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::ServerError("boom".into()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::NetworkError("reset".into()).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::DecodingError("eof".into()).category(), ApiErrorCategory::Decoding);
        assert_eq!(ApiError::Cancelled.category(), ApiErrorCategory::Local);
    }

    #[test]
    fn test_token_error_conversion() {
        assert_eq!(ApiError::from(TokenError::NoRefreshToken), ApiError::TokenMissing);
        assert_eq!(
            ApiError::from(TokenError::RefreshFailed("expired".into())),
            ApiError::Unauthorized
        );
        assert!(matches!(
            ApiError::from(TokenError::Storage(StorageError::AccessFailed("locked".into()))),
            ApiError::Storage(message) if message.contains("locked")
        ));
    }

    #[test]
    fn test_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        assert!(ApiError::TokenMissing.requires_login());
        assert!(!ApiError::Forbidden.requires_login());
    }

    #[test]
    fn test_into_wiki_error() {
        assert!(matches!(WikiError::from(ApiError::Config("x".into())), WikiError::Config(_)));
        assert!(matches!(WikiError::from(ApiError::Unauthorized), WikiError::Auth(_)));
        assert!(matches!(WikiError::from(ApiError::NotFound), WikiError::Internal(_)));
    }
}
