use std::time::Duration;

use beautywiki_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, StatusCode};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::interceptor::OutgoingRequest;

/// Raw response as read off the wire.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Shared HTTP transport.
///
/// Wraps one `reqwest::Client` (and its connection pool); clones share it.
/// The transport performs exactly one round trip per call: retrying is the
/// network client's decision, not the transport's.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    /// Send `request` and read the full response body.
    pub async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.clone();
        let url = request.url.clone();

        let mut builder =
            self.client.request(method.clone(), url.clone()).headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            ApiError::from(err)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ApiError::from)?.to_vec();

        debug!(%method, %url, %status, body_len = body.len(), "received HTTP response");
        Ok(HttpResponse { status, headers, body })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            default_headers: None,
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Method;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn get(url: &str) -> OutgoingRequest {
        OutgoingRequest {
            method: Method::GET,
            url: Url::parse(url).unwrap(),
            headers: HeaderMap::new(),
            body: None,
            requires_auth: false,
            is_external: false,
        }
    }

    #[tokio::test]
    async fn returns_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response = client.execute(&get(&server.uri())).await.expect("response");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"ok");
    }

    #[tokio::test]
    async fn does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response = client.execute(&get(&server.uri())).await.expect("response");

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .and(body_string(r#"{"username":"lin"}"#))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = get(&format!("{}/api/user/login", server.uri()));
        request.method = Method::POST;
        request.headers.insert("content-type", "application/json".parse().unwrap());
        request.body = Some(br#"{"username":"lin"}"#.to_vec());

        let client = HttpClient::new().expect("http client");
        let response = client.execute(&request).await.expect("response");
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(2))
            .accept_invalid_certs(false)
            .build()
            .expect("http client");

        let result = client.execute(&get(&format!("http://{addr}"))).await;
        assert!(matches!(result, Err(ApiError::NetworkError(_))), "got {result:?}");
    }
}
