//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use beautywiki_common::auth::TokenManager;
#[cfg(feature = "keychain")]
use beautywiki_common::storage::KeychainStore;
use beautywiki_common::storage::{MemoryStore, SecretStore};
use beautywiki_domain::{Config, Result, StorageBackend, WikiError};
use tracing::info;

use crate::api::{ApiError, NetworkClient};
use crate::http::HttpClient;
use crate::services::{
    AuthService, EncyclopediaService, SessionRefresher, SkinAnalysisService, VoiceService,
};

/// Application context - holds the session and every feature service
///
/// One [`TokenManager`] and one transport are shared by all services.
/// Session refresh goes through a separate anonymous client on the same
/// transport, so the token manager never calls back into itself.
pub struct WikiContext {
    pub config: Config,
    pub tokens: Arc<TokenManager>,
    pub client: NetworkClient,
    pub auth: AuthService,
    pub encyclopedia: EncyclopediaService,
    pub voice: VoiceService,
    pub skin_analysis: SkinAnalysisService,
}

impl WikiContext {
    /// Build the context with the storage backend named in `config`
    ///
    /// # Errors
    /// Returns `WikiError::Config` if the backend URL or transport settings
    /// are invalid, or the keychain backend is requested in a build without
    /// the `keychain` feature.
    pub fn new(config: Config) -> Result<Self> {
        let store = secret_store(&config)?;
        Self::with_store(config, store)
    }

    /// Build the context around an existing secret store
    ///
    /// # Errors
    /// Returns `WikiError::Config` if the backend URL or transport settings
    /// are invalid.
    pub fn with_store(config: Config, store: Arc<dyn SecretStore>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .user_agent(config.api.user_agent.clone())
            .build()?;

        let refresh_client = NetworkClient::builder()
            .base_url(config.api.base_url.clone())
            .http_client(http.clone())
            .build()?;
        let tokens = Arc::new(
            TokenManager::new(store)
                .with_refresher(Arc::new(SessionRefresher::new(refresh_client))),
        );

        let client = NetworkClient::builder()
            .base_url(config.api.base_url.clone())
            .http_client(http)
            .tokens(tokens.clone())
            .build()?;

        let auth = AuthService::new(client.clone(), tokens.clone());
        let encyclopedia = EncyclopediaService::new(client.clone());
        let voice = VoiceService::new(client.clone(), config.external.voice_base_url.clone());
        let skin_analysis = SkinAnalysisService::new(client.clone(), config.external.clone());

        info!(
            base_url = %client.base_url(),
            backend = ?config.storage.backend,
            "Context ready"
        );

        Ok(Self { config, tokens, client, auth, encyclopedia, voice, skin_analysis })
    }

    /// Load the persisted session
    ///
    /// Returns whether a persisted session was found, even an expired one
    /// that may still be refreshed.
    ///
    /// # Errors
    /// Returns `WikiError::Storage` if the secret store cannot be read.
    pub async fn initialize(&self) -> Result<bool> {
        self.tokens.initialize().await.map_err(|e| WikiError::from(ApiError::from(e)))
    }
}

fn secret_store(config: &Config) -> Result<Arc<dyn SecretStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "keychain")]
        StorageBackend::Keychain => {
            Ok(Arc::new(KeychainStore::new(config.storage.keychain_service.clone())))
        }
        #[cfg(not(feature = "keychain"))]
        StorageBackend::Keychain => Err(WikiError::Config(
            "keychain storage requires the `keychain` feature".to_string(),
        )),
    }
}
