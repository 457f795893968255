//! Network client
//!
//! Generic dispatch of [`ApiRequest`]s: URL building, header merge, body
//! encoding, the interceptor pipeline, the HTTP call and typed decoding.
//!
//! # Authentication retry
//!
//! ```text
//! Sent ──ok──────────────────────────────► Success
//!   │
//!   └─401─► Refreshing ──failed──► invalidate ─► Unauthorized (original)
//!                │
//!                └─ok─► Sent (retry) ──ok──► Success
//!                          │
//!                          └─401─► invalidate ─► Unauthorized
//! ```
//!
//! Only `requires_auth` calls using the managed token take this path; a
//! request with an explicit token, or a public endpoint, propagates its
//! `Unauthorized` unchanged. A `send` therefore makes at most two round
//! trips.

use std::collections::BTreeMap;
use std::sync::Arc;

use beautywiki_domain::{ApiRequest, Endpoint, HttpMethod};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::{AccessTokenProvider, AnonymousTokenProvider};
use super::codec;
use super::errors::ApiError;
use super::interceptor::{InterceptorPipeline, OutgoingRequest, ResponseMetadata};
use crate::http::HttpClient;

/// Typed API client
///
/// Cheap to clone: the transport, token provider and pipeline are shared.
#[derive(Clone)]
pub struct NetworkClient {
    http: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
    pipeline: Arc<InterceptorPipeline>,
    base_url: Url,
    default_headers: HeaderMap,
}

impl NetworkClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> NetworkClientBuilder {
        NetworkClientBuilder::default()
    }

    /// Default base URL for endpoints without an override
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `request` and decode its response
    ///
    /// # Errors
    /// - `TokenMissing` before any I/O when a `requires_auth` endpoint has no
    ///   token
    /// - `InvalidUrl` / `Encoding` when the request cannot be built
    /// - any error from the interceptors, the transport or decoding
    #[instrument(
        skip(self, request),
        fields(method = %request.endpoint().method(), path = %request.endpoint().path())
    )]
    pub async fn send<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
    ) -> Result<E::Response, ApiError> {
        let endpoint = request.endpoint();
        let managed_token = endpoint.requires_auth() && request.auth_token().is_none();

        let token = self.resolve_token(request).await?;
        match (self.attempt(request, token.as_deref()).await, token) {
            (Err(ApiError::Unauthorized), Some(rejected)) if managed_token => {
                self.retry_after_refresh(request, &rejected).await
            }
            (result, _) => result,
        }
    }

    /// [`NetworkClient::send`], abandoned as soon as `cancel` fires
    ///
    /// # Errors
    /// `ApiError::Cancelled` on cancellation, otherwise as `send`
    pub async fn send_cancellable<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
        cancel: &CancellationToken,
    ) -> Result<E::Response, ApiError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(path = %request.endpoint().path(), "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    async fn resolve_token<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
    ) -> Result<Option<String>, ApiError> {
        if !request.endpoint().requires_auth() {
            return Ok(None);
        }
        if let Some(token) = request.auth_token() {
            return Ok(Some(token.to_string()));
        }
        match self.tokens.access_token().await {
            Some(token) => Ok(Some(token)),
            None => {
                debug!(path = %request.endpoint().path(), "no token for authenticated endpoint");
                Err(ApiError::TokenMissing)
            }
        }
    }

    async fn retry_after_refresh<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
        rejected: &str,
    ) -> Result<E::Response, ApiError> {
        warn!("Received 401, refreshing token before retry");

        if let Err(e) = self.tokens.refresh_access_token(rejected).await {
            warn!(error = %e, "Token refresh failed, abandoning retry");
            self.tokens.invalidate().await;
            return Err(ApiError::Unauthorized);
        }

        let Some(token) = self.tokens.access_token().await else {
            warn!("No token after refresh, abandoning retry");
            self.tokens.invalidate().await;
            return Err(ApiError::Unauthorized);
        };

        let result = self.attempt(request, Some(&token)).await;
        if matches!(result, Err(ApiError::Unauthorized)) {
            warn!("Retry was rejected as well, invalidating session");
            self.tokens.invalidate().await;
        }
        result
    }

    async fn attempt<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
        token: Option<&str>,
    ) -> Result<E::Response, ApiError> {
        let outgoing = self.build_request(request, token)?;
        let outgoing = self.pipeline.run_request(outgoing).await?;

        let response = self.http.execute(&outgoing).await?;
        let metadata = ResponseMetadata {
            status: response.status,
            url: outgoing.url,
            headers: response.headers,
        };
        let body = self.pipeline.run_response(&metadata, response.body).await?;

        codec::decode_body(&body, request.endpoint().wire_keys())
    }

    /// Build the outgoing request for one attempt
    ///
    /// Deterministic: the same request and token always produce the same
    /// method, URL and headers. Header precedence, lowest first: client
    /// defaults, body content type, endpoint headers, bearer token.
    pub(crate) fn build_request<E: Endpoint>(
        &self,
        request: &ApiRequest<E>,
        token: Option<&str>,
    ) -> Result<OutgoingRequest, ApiError> {
        let endpoint = request.endpoint();
        let url = self.build_url(endpoint, request.query_items())?;

        let mut headers = self.default_headers.clone();

        let body = match request.body() {
            Some(body) => {
                let encoded =
                    codec::encode_body(body, endpoint.wire_keys(), endpoint.body_encoding())?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(encoded.content_type));
                Some(encoded.bytes)
            }
            None => None,
        };

        merge_headers(&mut headers, &endpoint.headers())?;

        if endpoint.requires_auth() && !endpoint.is_external() {
            if let Some(token) = token {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::Encoding(format!("invalid bearer token: {e}")))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(OutgoingRequest {
            method: to_reqwest_method(endpoint.method()),
            url,
            headers,
            body,
            requires_auth: endpoint.requires_auth(),
            is_external: endpoint.is_external(),
        })
    }

    fn build_url<E: Endpoint>(
        &self,
        endpoint: &E,
        query_items: &[(String, String)],
    ) -> Result<Url, ApiError> {
        let path = endpoint.path();
        if path.contains(['?', '#']) {
            return Err(ApiError::InvalidUrl(format!(
                "path must not carry a query or fragment: {path}"
            )));
        }

        let mut url = match endpoint.base_url() {
            Some(base) => Url::parse(base)
                .map_err(|e| ApiError::InvalidUrl(format!("invalid base URL {base}: {e}")))?,
            None => self.base_url.clone(),
        };
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("not a base URL: {url}")));
        }

        if !path.is_empty() {
            let joined =
                format!("{}/{}", url.path().trim_end_matches('/'), path.trim_start_matches('/'));
            url.set_path(&joined);
        }

        if !query_items.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query_items.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

impl std::fmt::Debug for NetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClient")
            .field("base_url", &self.base_url.as_str())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

fn merge_headers(
    target: &mut HeaderMap,
    headers: &BTreeMap<String, String>,
) -> Result<(), ApiError> {
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Encoding(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Encoding(format!("invalid value for header {name}: {e}")))?;
        target.insert(name, value);
    }
    Ok(())
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

/// Builder for [`NetworkClient`]
#[derive(Default)]
pub struct NetworkClientBuilder {
    base_url: Option<String>,
    http: Option<HttpClient>,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    pipeline: Option<InterceptorPipeline>,
    default_headers: BTreeMap<String, String>,
}

impl NetworkClientBuilder {
    /// Default base URL (required)
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Shared transport; a default one is built when unset
    #[must_use]
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Token source; the client is anonymous when unset
    #[must_use]
    pub fn tokens(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Replace the default interceptor pipeline
    #[must_use]
    pub fn pipeline(mut self, pipeline: InterceptorPipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Header sent with every request unless an endpoint overrides it
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Build the network client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the base URL is missing or invalid, or
    /// the transport cannot be created
    pub fn build(self) -> Result<NetworkClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Config("Base URL not set".to_string()))?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("Not a base URL: {base_url}")));
        }

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::new()?,
        };
        let tokens = self.tokens.unwrap_or_else(|| Arc::new(AnonymousTokenProvider));
        let pipeline = self
            .pipeline
            .unwrap_or_else(|| InterceptorPipeline::with_defaults(tokens.clone(), &base_url));

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(codec::JSON_CONTENT_TYPE));
        merge_headers(&mut default_headers, &self.default_headers)
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(NetworkClient {
            http,
            tokens,
            pipeline: Arc::new(pipeline),
            base_url,
            default_headers,
        })
    }
}
