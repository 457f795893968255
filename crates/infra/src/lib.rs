//! # BeautyWiki Infrastructure
//!
//! Networking core of the BeautyWiki client.
//!
//! This crate contains:
//! - The typed network client with its interceptor pipeline ([`api`])
//! - The shared HTTP transport ([`http`])
//! - Feature services: account, encyclopedia, voice search and skin
//!   analysis ([`services`])
//! - Configuration loading and log setup
//! - The composition root ([`WikiContext`])
//!
//! ## Architecture
//! - Endpoint descriptors and models come from `beautywiki-domain`
//! - Session storage and the token manager come from `beautywiki-common`
//! - Contains all "impure" code (network I/O, keychain access)

pub mod api;
pub mod config;
pub mod context;
pub mod http;
pub mod observability;
pub mod services;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiError, ApiErrorCategory, NetworkClient};
pub use context::WikiContext;
pub use http::{HttpClient, HttpClientBuilder, HttpResponse};
pub use observability::init_tracing;
pub use services::*;
