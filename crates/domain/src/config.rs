//! Configuration structures
//!
//! Every section has defaults, so a partial file (or none at all) yields a
//! working configuration pointed at the production backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOG_FILTER, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, FACE_PLUS_PLUS_BASE_URL, IMGUR_BASE_URL,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub external: ExternalApiConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where the session is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// System keychain
    #[default]
    Keychain,
    /// Process memory (tests, ephemeral sessions)
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keychain" => Ok(Self::Keychain),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}

/// Third-party API settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalApiConfig {
    pub face_plus_plus_base_url: String,
    pub face_plus_plus_api_key: Option<String>,
    pub face_plus_plus_api_secret: Option<String>,
    pub imgur_base_url: String,
    pub imgur_client_id: Option<String>,
    /// Voice search host; the backend host is used when unset
    pub voice_base_url: Option<String>,
}

impl Default for ExternalApiConfig {
    fn default() -> Self {
        Self {
            face_plus_plus_base_url: FACE_PLUS_PLUS_BASE_URL.to_string(),
            face_plus_plus_api_key: None,
            face_plus_plus_api_secret: None,
            imgur_base_url: IMGUR_BASE_URL.to_string(),
            imgur_client_id: None,
            voice_base_url: None,
        }
    }
}

impl fmt::Debug for ExternalApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ExternalApiConfig")
            .field("face_plus_plus_base_url", &self.face_plus_plus_base_url)
            .field("face_plus_plus_api_key", &redact(&self.face_plus_plus_api_key))
            .field("face_plus_plus_api_secret", &redact(&self.face_plus_plus_api_secret))
            .field("imgur_base_url", &self.imgur_base_url)
            .field("imgur_client_id", &redact(&self.imgur_client_id))
            .field("voice_base_url", &self.voice_base_url)
            .finish()
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[api]
base_url = "http://localhost:8080"

[storage]
backend = "memory"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.keychain_service, DEFAULT_KEYCHAIN_SERVICE);
        assert_eq!(config.external.face_plus_plus_base_url, FACE_PLUS_PLUS_BASE_URL);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("Keychain".parse::<StorageBackend>(), Ok(StorageBackend::Keychain));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_debug_redacts_external_credentials() {
        let external = ExternalApiConfig {
            face_plus_plus_api_key: Some("key-123".into()),
            face_plus_plus_api_secret: Some("secret-456".into()),
            imgur_client_id: Some("client-789".into()),
            ..ExternalApiConfig::default()
        };
        let rendered = format!("{external:?}");
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
        assert!(!rendered.contains("client-789"));
    }
}
