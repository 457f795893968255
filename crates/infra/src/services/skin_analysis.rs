//! Skin analysis through third-party providers
//!
//! A photo is first hosted on Imgur, then its public URL is handed to the
//! Face++ detect API which scores skin health, beauty, age and gender.
//! Neither provider sees the user's bearer token.

use std::borrow::Cow;
use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use beautywiki_domain::constants::FACE_ATTRIBUTES;
use beautywiki_domain::types::{
    FaceDetectRequest, FaceDetectResponse, ImgurData, ImgurImage, ImgurResponse,
    ImgurUploadRequest,
};
use beautywiki_domain::{
    ApiRequest, BodyEncoding, Endpoint, ExternalApiConfig, HttpMethod, WireKeys,
};
use tracing::{info, instrument, warn};

use crate::api::{ApiError, NetworkClient};

/// Imgur `POST /3/image`
#[derive(Debug, Clone)]
pub struct ImgurUploadEndpoint {
    base_url: String,
    client_id: String,
}

impl Endpoint for ImgurUploadEndpoint {
    type Request = ImgurUploadRequest;
    type Response = ImgurResponse<ImgurData<ImgurImage>>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/3/image")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("Authorization".to_string(), format!("Client-ID {}", self.client_id))])
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    fn is_external(&self) -> bool {
        true
    }

    fn wire_keys(&self) -> WireKeys {
        WireKeys::Verbatim
    }

    fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::Form
    }
}

/// Face++ `POST /facepp/v3/detect`
#[derive(Debug, Clone)]
pub struct FaceDetectEndpoint {
    base_url: String,
}

impl Endpoint for FaceDetectEndpoint {
    type Request = FaceDetectRequest;
    type Response = FaceDetectResponse;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/facepp/v3/detect")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    fn is_external(&self) -> bool {
        true
    }

    fn wire_keys(&self) -> WireKeys {
        WireKeys::Verbatim
    }

    fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::Form
    }
}

#[derive(Clone)]
pub struct SkinAnalysisService {
    client: NetworkClient,
    config: ExternalApiConfig,
}

impl SkinAnalysisService {
    pub fn new(client: NetworkClient, config: ExternalApiConfig) -> Self {
        Self { client, config }
    }

    /// Host base64-encoded image data on Imgur
    ///
    /// # Errors
    /// - `ApiError::Config` when no Imgur client id is configured
    /// - `ApiError::ServerError` with Imgur's reason when it reports a failed
    ///   upload inside a successful response
    #[instrument(skip(self, image_base64), fields(len = image_base64.len()))]
    pub async fn upload_image(&self, image_base64: &str) -> Result<ImgurImage, ApiError> {
        let client_id = self
            .config
            .imgur_client_id
            .clone()
            .ok_or_else(|| ApiError::Config("Imgur client id is not configured".to_string()))?;

        let endpoint =
            ImgurUploadEndpoint { base_url: self.config.imgur_base_url.clone(), client_id };
        let request =
            ApiRequest::new(endpoint).with_body(ImgurUploadRequest::base64(image_base64));

        let ImgurResponse { data, success, status } = self.client.send(&request).await?;
        match data {
            ImgurData::Payload(image) if success => {
                info!(id = %image.id, "Image uploaded");
                Ok(image)
            }
            data => {
                let message = data.failure().and_then(|f| f.message()).map_or_else(
                    || format!("Imgur upload failed with status {status}"),
                    str::to_string,
                );
                warn!(status, %message, "Imgur rejected the upload");
                Err(ApiError::ServerError(message))
            }
        }
    }

    /// Encode raw image bytes and host them on Imgur
    pub async fn upload_bytes(&self, image: &[u8]) -> Result<ImgurImage, ApiError> {
        self.upload_image(&STANDARD.encode(image)).await
    }

    /// Run Face++ detection on a publicly reachable image
    ///
    /// # Errors
    /// `ApiError::Config` when the Face++ key or secret is missing
    #[instrument(skip(self))]
    pub async fn analyze(&self, image_url: &str) -> Result<FaceDetectResponse, ApiError> {
        let (api_key, api_secret) = self.face_credentials()?;
        let body = FaceDetectRequest {
            api_key,
            api_secret,
            image_url: Some(image_url.to_string()),
            image_base64: None,
            return_attributes: FACE_ATTRIBUTES.to_string(),
        };
        self.detect(body).await
    }

    /// Run Face++ detection on raw image bytes, skipping the upload
    pub async fn analyze_bytes(&self, image: &[u8]) -> Result<FaceDetectResponse, ApiError> {
        let (api_key, api_secret) = self.face_credentials()?;
        let body = FaceDetectRequest {
            api_key,
            api_secret,
            image_url: None,
            image_base64: Some(STANDARD.encode(image)),
            return_attributes: FACE_ATTRIBUTES.to_string(),
        };
        self.detect(body).await
    }

    async fn detect(&self, body: FaceDetectRequest) -> Result<FaceDetectResponse, ApiError> {
        let base_url = self.config.face_plus_plus_base_url.clone();
        let endpoint = FaceDetectEndpoint { base_url };
        let response = self.client.send(&ApiRequest::new(endpoint).with_body(body)).await?;
        info!(
            request_id = %response.request_id,
            faces = response.faces.len(),
            "Face detection finished"
        );
        Ok(response)
    }

    fn face_credentials(&self) -> Result<(String, String), ApiError> {
        match (&self.config.face_plus_plus_api_key, &self.config.face_plus_plus_api_secret) {
            (Some(key), Some(secret)) => Ok((key.clone(), secret.clone())),
            _ => Err(ApiError::Config("Face++ credentials are not configured".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use beautywiki_common::storage::MemoryStore;
    use beautywiki_common::{Session, TokenManager};
    use chrono::{Duration, Utc};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> ExternalApiConfig {
        ExternalApiConfig {
            face_plus_plus_base_url: server.uri(),
            face_plus_plus_api_key: Some("key".into()),
            face_plus_plus_api_secret: Some("secret".into()),
            imgur_base_url: server.uri(),
            imgur_client_id: Some("cid".into()),
            voice_base_url: None,
        }
    }

    async fn service(config: ExternalApiConfig) -> SkinAnalysisService {
        let tokens = Arc::new(TokenManager::new(Arc::new(MemoryStore::new())));
        tokens
            .store_session(Session::new("user-token", None, Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        let client = NetworkClient::builder()
            .base_url("https://wiki.invalid")
            .tokens(tokens)
            .build()
            .unwrap();
        SkinAnalysisService::new(client, config)
    }

    fn detect_body() -> serde_json::Value {
        serde_json::json!({
            "request_id": "r-1",
            "time_used": 120,
            "faces": [{
                "face_token": "f-1",
                "face_rectangle": {"top": 1, "left": 2, "width": 30, "height": 40},
                "attributes": {
                    "skinstatus": {"health": 8.1, "stain": 2.0, "dark_circle": 5.5, "acne": 1.2}
                }
            }],
            "face_num": 1
        })
    }

    fn never_bearer(request: &Request) -> bool {
        request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map_or(true, |v| !v.starts_with("Bearer"))
    }

    #[tokio::test]
    async fn test_upload_uses_client_id_and_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/image"))
            .and(header("authorization", "Client-ID cid"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("type=base64"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": "abc", "link": "https://i.imgur.com/abc.jpg"},
                "success": true,
                "status": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = service(config(&server)).await.upload_bytes(b"jpeg").await.unwrap();
        assert_eq!(image.link, "https://i.imgur.com/abc.jpg");
    }

    #[tokio::test]
    async fn test_upload_failure_envelope_carries_imgur_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"error": "Image format not supported", "request": "/3/image"},
                "success": false,
                "status": 400
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = service(config(&server)).await.upload_image("aGk=").await.unwrap_err();
        assert_eq!(err, ApiError::ServerError("Image format not supported".into()));
    }

    #[tokio::test]
    async fn test_upload_without_client_id_is_config_error() {
        let server = MockServer::start().await;
        let mut cfg = config(&server);
        cfg.imgur_client_id = None;

        let err = service(cfg).await.upload_image("aGk=").await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_sends_credentials_and_attributes_without_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/facepp/v3/detect"))
            .and(body_string_contains("api_key=key"))
            .and(body_string_contains("api_secret=secret"))
            .and(body_string_contains("return_attributes=skinstatus%2Cbeauty%2Cage%2Cgender"))
            .and(body_string_contains("image_url=https%3A%2F%2Fi.imgur.com%2Fabc.jpg"))
            .and(never_bearer)
            .respond_with(ResponseTemplate::new(200).set_body_json(detect_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = service(config(&server))
            .await
            .analyze("https://i.imgur.com/abc.jpg")
            .await
            .unwrap();

        let face = result.primary_face().unwrap();
        let skin = face.attributes.as_ref().and_then(|a| a.skinstatus.as_ref()).unwrap();
        assert!((skin.health - 8.1).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_provider_rejection_maps_to_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/facepp/v3/detect"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error_message": "AUTHORIZATION_ERROR"
            })))
            .mount(&server)
            .await;

        let err = service(config(&server)).await.analyze("https://x").await.unwrap_err();
        assert_eq!(err, ApiError::Forbidden);
    }

    #[tokio::test]
    async fn test_missing_face_credentials_is_config_error() {
        let server = MockServer::start().await;
        let mut cfg = config(&server);
        cfg.face_plus_plus_api_secret = None;

        let err = service(cfg).await.analyze_bytes(b"jpeg").await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
