//! Wire models
//!
//! Backend models name their fields in camelCase in memory
//! (`#[serde(rename_all = "camelCase")]`); the codec translates to the
//! backend's snake_case keys. Third-party models (Face++, Imgur) keep the
//! provider's own key names and are sent verbatim.
//!
//! Backend timestamps decode strictly from `yyyy-MM-dd HH:mm:ss` (UTC+8)
//! through [`beautywiki_common::utils::wire_date`].

pub mod article;
pub mod auth;
pub mod skin;
pub mod voice;

pub use article::{
    Article, ArticlePage, ArticleSummary, Comment, CommentAuthor, NewComment, VisitRecord,
};
pub use auth::{LoginRequest, LoginResponse, RefreshRequest, UserProfile};
pub use skin::{
    BeautyScore, Face, FaceAttributes, FaceDetectRequest, FaceDetectResponse, FaceRectangle,
    ImgurData, ImgurErrorDetail, ImgurFailure, ImgurImage, ImgurResponse, ImgurUploadRequest,
    SkinStatus, ValueOf,
};
pub use voice::{VoiceMatch, VoiceSearchRequest, VoiceSearchResponse};
