//! Feature services.
//!
//! Each service owns the endpoint descriptors of its feature and exposes
//! domain-level async methods on top of the shared [`NetworkClient`].
//!
//! [`NetworkClient`]: crate::api::NetworkClient

pub mod auth;
pub mod encyclopedia;
pub mod skin_analysis;
pub mod voice;

pub use auth::{AuthService, SessionRefresher};
pub use encyclopedia::EncyclopediaService;
pub use skin_analysis::SkinAnalysisService;
pub use voice::VoiceService;
