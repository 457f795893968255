//! Error types used outside the request path
//!
//! Request failures are reported as `ApiError` by the infra crate; this enum
//! covers configuration, storage and start-up problems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for BeautyWiki
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WikiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for BeautyWiki operations
pub type Result<T> = std::result::Result<T, WikiError>;
