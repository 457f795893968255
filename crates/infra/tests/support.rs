use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use beautywiki_common::storage::MemoryStore;
use beautywiki_common::{Session, TokenManager};
use beautywiki_domain::{Endpoint, HttpMethod};
use beautywiki_infra::api::{
    AccessTokenProvider, ApiError, ResponseInterceptor, ResponseMetadata,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Model used by the generic endpoints below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub article_id: i64,
    #[serde(default)]
    pub note_text: Option<String>,
}

/// `GET /api/user/favorites`, authenticated.
#[derive(Debug, Clone, Copy)]
pub struct FavoritesEndpoint;

impl Endpoint for FavoritesEndpoint {
    type Request = ();
    type Response = Vec<Favorite>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/favorites")
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

/// `POST /api/user/favorites`, authenticated.
#[derive(Debug, Clone, Copy)]
pub struct AddFavoriteEndpoint;

impl Endpoint for AddFavoriteEndpoint {
    type Request = Favorite;
    type Response = Favorite;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/favorites")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

pub fn favorites_body() -> serde_json::Value {
    serde_json::json!([{"article_id": 3, "note_text": "holy grail serum"}])
}

/// Token provider double that always has a token and counts every call.
#[derive(Default)]
pub struct CountingProvider {
    pub access_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub invalidations: AtomicUsize,
}

impl CountingProvider {
    pub fn access_calls(&self) -> usize {
        self.access_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenProvider for CountingProvider {
    async fn access_token(&self) -> Option<String> {
        let n = self.access_calls.fetch_add(1, Ordering::SeqCst);
        Some(format!("token-{n}"))
    }

    async fn refresh_access_token(&self, _rejected: &str) -> Result<(), ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Response interceptor double rejecting the first `failures` responses
/// with `Unauthorized`, whatever their real status.
pub struct RejectFirst {
    failures: usize,
    seen: AtomicUsize,
}

impl RejectFirst {
    pub fn always() -> Self {
        Self { failures: usize::MAX, seen: AtomicUsize::new(0) }
    }

    pub fn once() -> Self {
        Self { failures: 1, seen: AtomicUsize::new(0) }
    }

    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseInterceptor for RejectFirst {
    async fn intercept_response(
        &self,
        _response: &ResponseMetadata,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        let n = self.seen.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(ApiError::Unauthorized)
        } else {
            Ok(body)
        }
    }
}

/// Token manager over an in-memory store, optionally signed in.
pub async fn token_manager(token: Option<&str>) -> (Arc<TokenManager>, MemoryStore) {
    let store = MemoryStore::new();
    let tokens = Arc::new(TokenManager::new(Arc::new(store.clone())));
    if let Some(token) = token {
        tokens
            .store_session(Session::new(token, None, Utc::now() + Duration::hours(1)))
            .await
            .expect("session should be stored");
    }
    (tokens, store)
}

/// Login response body in the backend's wire format.
pub fn login_body(token: &str, refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "token": token,
        "refresh_token": refresh_token,
        "expires_at": "2099-12-31 23:00:00",
        "user": {"id": 42, "username": "mei", "nickname": "Mei"}
    })
}
