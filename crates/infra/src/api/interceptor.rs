//! Request/response interceptor pipeline
//!
//! Request interceptors see the fully built [`OutgoingRequest`] and may
//! replace it; response interceptors see the status line and raw body and
//! may reject the response. Both run strictly in registration order and the
//! first failure aborts the request.
//!
//! Defaults ([`InterceptorPipeline::with_defaults`]):
//!
//! | Stage    | Interceptors                                   |
//! |----------|------------------------------------------------|
//! | request  | [`TracingInterceptor`], [`AuthHeaderInterceptor`] |
//! | response | [`TracingInterceptor`], [`StatusCodeInterceptor`] |

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::{Origin, Url};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;

/// Message used when a 5xx body carries none
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// Envelope keys searched, in order, for a server error message
const MESSAGE_KEYS: [&str; 5] = ["message", "msg", "error", "detail", "error_message"];

/// A request ready for the transport
#[derive(Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub requires_auth: bool,
    pub is_external: bool,
}

impl fmt::Debug for OutgoingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.keys().map(|k| k.as_str()).collect();
        f.debug_struct("OutgoingRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("requires_auth", &self.requires_auth)
            .field("is_external", &self.is_external)
            .finish()
    }
}

/// Status line and headers of a received response
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
}

/// Mutates or rejects a request before it is sent
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// # Errors
    /// Any error aborts the request and is returned from `send`
    async fn intercept_request(&self, request: OutgoingRequest)
        -> Result<OutgoingRequest, ApiError>;
}

/// Validates a response before it is decoded
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// # Errors
    /// Any error aborts decoding and is returned from `send` (an
    /// `Unauthorized` may still trigger the retry policy)
    async fn intercept_response(
        &self,
        response: &ResponseMetadata,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError>;
}

/// Ordered interceptor chains
#[derive(Clone, Default)]
pub struct InterceptorPipeline {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorPipeline {
    /// Empty pipeline: no auth header fallback and no status validation
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard pipeline for a client whose tokens come from `tokens` and
    /// whose backend lives at `backend`
    pub fn with_defaults(tokens: Arc<dyn AccessTokenProvider>, backend: &Url) -> Self {
        Self::new()
            .with_request_interceptor(Arc::new(TracingInterceptor))
            .with_request_interceptor(Arc::new(AuthHeaderInterceptor::new(tokens, backend)))
            .with_response_interceptor(Arc::new(TracingInterceptor))
            .with_response_interceptor(Arc::new(StatusCodeInterceptor))
    }

    #[must_use]
    pub fn with_request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request.push(interceptor);
        self
    }

    #[must_use]
    pub fn with_response_interceptor(
        mut self,
        interceptor: Arc<dyn ResponseInterceptor>,
    ) -> Self {
        self.response.push(interceptor);
        self
    }

    /// Run the request chain
    ///
    /// # Errors
    /// The first interceptor failure
    pub async fn run_request(&self, request: OutgoingRequest) -> Result<OutgoingRequest, ApiError> {
        let mut request = request;
        for interceptor in &self.request {
            request = interceptor.intercept_request(request).await?;
        }
        Ok(request)
    }

    /// Run the response chain
    ///
    /// # Errors
    /// The first interceptor failure
    pub async fn run_response(
        &self,
        response: &ResponseMetadata,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        let mut body = body;
        for interceptor in &self.response {
            body = interceptor.intercept_response(response, body).await?;
        }
        Ok(body)
    }

    pub fn request_len(&self) -> usize {
        self.request.len()
    }

    pub fn response_len(&self) -> usize {
        self.response.len()
    }
}

impl fmt::Debug for InterceptorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorPipeline")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

/// Adds `Authorization: Bearer <token>` to backend requests when a session
/// exists.
///
/// Advisory only: the client already sets the header on `requires_auth`
/// calls and fails them without a token. This covers public endpoints that
/// personalise their answer for signed-in users. External endpoints,
/// requests to any origin other than the backend's, and requests that
/// already carry `Authorization` are left alone, and the provider is not
/// consulted for them.
pub struct AuthHeaderInterceptor {
    tokens: Arc<dyn AccessTokenProvider>,
    backend: Origin,
}

impl AuthHeaderInterceptor {
    pub fn new(tokens: Arc<dyn AccessTokenProvider>, backend: &Url) -> Self {
        Self { tokens, backend: backend.origin() }
    }
}

#[async_trait]
impl RequestInterceptor for AuthHeaderInterceptor {
    async fn intercept_request(
        &self,
        mut request: OutgoingRequest,
    ) -> Result<OutgoingRequest, ApiError> {
        if request.is_external
            || request.headers.contains_key(AUTHORIZATION)
            || request.url.origin() != self.backend
        {
            return Ok(request);
        }

        if let Some(token) = self.tokens.access_token().await {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Encoding(format!("invalid bearer token: {e}")))?;
            request.headers.insert(AUTHORIZATION, value);
        }
        Ok(request)
    }
}

/// Maps HTTP status codes to [`ApiError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeInterceptor;

impl StatusCodeInterceptor {
    /// Check `status`, reading a server message from `body` for 5xx
    ///
    /// # Errors
    /// - 401 `Unauthorized`, 403 `Forbidden`, 404 `NotFound`
    /// - 500-599 `ServerError` with the extracted message
    /// - anything else outside 200-299 `Unknown(code)`
    pub fn check(status: StatusCode, body: &[u8]) -> Result<(), ApiError> {
        match status.as_u16() {
            200..=299 => Ok(()),
            401 => Err(ApiError::Unauthorized),
            403 => Err(ApiError::Forbidden),
            404 => Err(ApiError::NotFound),
            500..=599 => Err(ApiError::ServerError(server_message(body))),
            code => Err(ApiError::Unknown(code)),
        }
    }
}

#[async_trait]
impl ResponseInterceptor for StatusCodeInterceptor {
    async fn intercept_response(
        &self,
        response: &ResponseMetadata,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        Self::check(response.status, &body)?;
        Ok(body)
    }
}

/// Best-effort message from an error envelope
fn server_message(body: &[u8]) -> String {
    let Ok(Value::Object(envelope)) = serde_json::from_slice::<Value>(body) else {
        return DEFAULT_SERVER_ERROR_MESSAGE.to_string();
    };

    MESSAGE_KEYS
        .iter()
        .find_map(|key| match envelope.get(*key) {
            Some(Value::String(message)) if !message.trim().is_empty() => Some(message.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_SERVER_ERROR_MESSAGE.to_string())
}

/// Logs each request and response at `debug`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInterceptor;

#[async_trait]
impl RequestInterceptor for TracingInterceptor {
    async fn intercept_request(
        &self,
        request: OutgoingRequest,
    ) -> Result<OutgoingRequest, ApiError> {
        debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "sending API request"
        );
        Ok(request)
    }
}

#[async_trait]
impl ResponseInterceptor for TracingInterceptor {
    async fn intercept_response(
        &self,
        response: &ResponseMetadata,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        debug!(
            status = response.status.as_u16(),
            url = %response.url,
            body_len = body.len(),
            "received API response"
        );
        Ok(body)
    }
}
