//! Skin analysis models (Face++ detect and Imgur hosting)
//!
//! Both providers are third-party APIs: field names match their documented
//! keys and are sent verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Form body of Face++ `POST /facepp/v3/detect`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct FaceDetectRequest {
    pub api_key: String,
    pub api_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    pub return_attributes: String,
}

impl fmt::Debug for FaceDetectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceDetectRequest")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("image_url", &self.image_url)
            .field("has_image_base64", &self.image_base64.is_some())
            .field("return_attributes", &self.return_attributes)
            .finish()
    }
}

/// Face++ detect result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetectResponse {
    pub request_id: String,
    #[serde(default)]
    pub time_used: u64,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub face_num: Option<u32>,
}

impl FaceDetectResponse {
    /// Largest detected face, which is the one analysed
    #[must_use]
    pub fn primary_face(&self) -> Option<&Face> {
        self.faces.iter().max_by_key(|face| face.face_rectangle.area())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub face_token: String,
    pub face_rectangle: FaceRectangle,
    #[serde(default)]
    pub attributes: Option<FaceAttributes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRectangle {
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Attributes requested through `return_attributes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceAttributes {
    #[serde(default)]
    pub gender: Option<ValueOf<String>>,
    #[serde(default)]
    pub age: Option<ValueOf<u32>>,
    #[serde(default)]
    pub beauty: Option<BeautyScore>,
    #[serde(default)]
    pub skinstatus: Option<SkinStatus>,
}

/// Face++ wraps scalar attributes as `{"value": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOf<T> {
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeautyScore {
    pub male_score: f64,
    pub female_score: f64,
}

/// Skin condition scores, 0 to 100 (higher means more pronounced)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinStatus {
    pub health: f64,
    pub stain: f64,
    pub dark_circle: f64,
    pub acne: f64,
}

/// Form body of Imgur `POST /3/image`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ImgurUploadRequest {
    /// Base64 image data
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ImgurUploadRequest {
    #[must_use]
    pub fn base64(image: impl Into<String>) -> Self {
        Self { image: image.into(), kind: "base64".to_string() }
    }
}

impl fmt::Debug for ImgurUploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImgurUploadRequest")
            .field("image_len", &self.image.len())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Imgur response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgurResponse<T> {
    pub data: T,
    pub success: bool,
    pub status: u16,
}

/// `data` of an Imgur envelope: the payload, or the failure Imgur reported
/// in its place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImgurData<T> {
    Payload(T),
    Failure(ImgurFailure),
}

impl<T> ImgurData<T> {
    /// Failure detail, if Imgur sent one
    #[must_use]
    pub const fn failure(&self) -> Option<&ImgurFailure> {
        match self {
            Self::Payload(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// Failure body Imgur returns instead of the payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgurFailure {
    #[serde(default)]
    pub error: Option<ImgurErrorDetail>,
    #[serde(default)]
    pub request: Option<String>,
}

impl ImgurFailure {
    /// Human-readable reason
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.error {
            Some(ImgurErrorDetail::Message(message) | ImgurErrorDetail::Detailed { message }) => {
                Some(message.as_str())
            }
            None => None,
        }
    }
}

/// Imgur reports errors either as a plain string or as an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImgurErrorDetail {
    Message(String),
    Detailed { message: String },
}

/// Uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgurImage {
    pub id: String,
    pub link: String,
    #[serde(default)]
    pub deletehash: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}
