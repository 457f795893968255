//! # BeautyWiki Domain
//!
//! Business domain types and models for the BeautyWiki client.
//!
//! This crate contains:
//! - The [`Endpoint`] descriptor trait and the [`ApiRequest`] envelope
//! - Wire models for the backend, Face++ and Imgur
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - Depends only on `beautywiki-common` (wire date serde helpers)
//! - No I/O: descriptors say *what* to send, the infra crate sends it

pub mod config;
pub mod constants;
pub mod endpoint;
pub mod errors;
pub mod request;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use endpoint::{BodyEncoding, Endpoint, HttpMethod, WireKeys};
pub use errors::*;
pub use request::ApiRequest;
