//! Voice search
//!
//! A speech transcript is matched against articles by a nearest-neighbour
//! service. It may live on its own host; when none is configured the
//! backend host serves it. A separate host is third-party and never sees the
//! user's bearer token.

use std::borrow::Cow;

use beautywiki_domain::constants::VOICE_SEARCH_TOP_K;
use beautywiki_domain::types::{VoiceSearchRequest, VoiceSearchResponse};
use beautywiki_domain::{ApiRequest, Endpoint, HttpMethod};
use tracing::debug;

use crate::api::{ApiError, NetworkClient};

/// `POST /api/voice/search`
#[derive(Debug, Clone, Default)]
pub struct VoiceSearchEndpoint {
    pub base_url: Option<String>,
}

impl Endpoint for VoiceSearchEndpoint {
    type Request = VoiceSearchRequest;
    type Response = VoiceSearchResponse;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/voice/search")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn is_external(&self) -> bool {
        self.base_url.is_some()
    }
}

#[derive(Clone)]
pub struct VoiceService {
    client: NetworkClient,
    base_url: Option<String>,
}

impl VoiceService {
    pub fn new(client: NetworkClient, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    /// Closest articles for a transcript, best first
    pub async fn search(&self, transcript: &str) -> Result<VoiceSearchResponse, ApiError> {
        let query = transcript.trim();
        if query.is_empty() {
            return Ok(VoiceSearchResponse { matches: Vec::new() });
        }

        let endpoint = VoiceSearchEndpoint { base_url: self.base_url.clone() };
        let body = VoiceSearchRequest { query: query.to_string(), top_k: VOICE_SEARCH_TOP_K };
        let request = ApiRequest::new(endpoint).with_body(body);

        let mut response = self.client.send(&request).await?;
        response.matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(matches = response.matches.len(), "Voice search finished");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use beautywiki_common::storage::MemoryStore;
    use beautywiki_common::{Session, TokenManager};
    use chrono::{Duration, Utc};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    async fn signed_in_client(base_url: &str) -> NetworkClient {
        let tokens = Arc::new(TokenManager::new(Arc::new(MemoryStore::new())));
        tokens
            .store_session(Session::new("user-token", None, Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        NetworkClient::builder().base_url(base_url).tokens(tokens).build().unwrap()
    }

    fn matches_body() -> serde_json::Value {
        serde_json::json!({
            "matches": [
                {"article_id": 1, "title": "Sunscreen", "score": 0.4},
                {"article_id": 2, "title": "Vitamin C", "score": 0.9}
            ]
        })
    }

    #[tokio::test]
    async fn test_search_posts_transcript_to_voice_host() {
        let backend = MockServer::start().await;
        let voice = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/search"))
            .and(body_json(serde_json::json!({"query": "dry skin in winter", "top_k": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches_body()))
            .expect(1)
            .mount(&voice)
            .await;

        let client = NetworkClient::builder().base_url(backend.uri()).build().unwrap();
        let service = VoiceService::new(client, Some(voice.uri()));
        let response = service.search(" dry skin in winter ").await.unwrap();

        assert_eq!(response.matches[0].article_id, 2);
        assert!(backend.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_falls_back_to_backend_host() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches_body()))
            .expect(1)
            .mount(&backend)
            .await;

        let client = NetworkClient::builder().base_url(backend.uri()).build().unwrap();
        let response = VoiceService::new(client, None).search("toner").await.unwrap();
        assert_eq!(response.best().map(|m| m.title.as_str()), Some("Vitamin C"));
    }

    #[tokio::test]
    async fn test_blank_transcript_skips_request() {
        let backend = MockServer::start().await;
        let client = NetworkClient::builder().base_url(backend.uri()).build().unwrap();

        let response = VoiceService::new(client, None).search("   ").await.unwrap();
        assert!(response.matches.is_empty());
        assert!(backend.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_separate_voice_host_never_sees_bearer() {
        let backend = MockServer::start().await;
        let voice = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/search"))
            .and(|request: &Request| !request.headers.contains_key("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches_body()))
            .expect(1)
            .mount(&voice)
            .await;

        let client = signed_in_client(&backend.uri()).await;
        let response = VoiceService::new(client, Some(voice.uri())).search("serum").await;

        assert_eq!(response.unwrap().matches.len(), 2);
    }

    #[tokio::test]
    async fn test_backend_voice_search_keeps_session_header() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/search"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches_body()))
            .expect(1)
            .mount(&backend)
            .await;

        let client = signed_in_client(&backend.uri()).await;
        let response = VoiceService::new(client, None).search("serum").await;
        assert!(response.is_ok());
    }
}
