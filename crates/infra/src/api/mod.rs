//! Typed networking layer
//!
//! Feature services describe calls as [`beautywiki_domain::Endpoint`]s and
//! send them through one shared [`NetworkClient`].
//!
//! # Architecture
//!
//! - [`client`]: URL/header/body building, dispatch and the 401 retry policy
//! - [`interceptor`]: ordered request/response hooks (auth header, status
//!   mapping, tracing)
//! - [`codec`]: snake_case ⇄ camelCase JSON and form bodies
//! - [`auth`]: the [`AccessTokenProvider`] seam over the token manager
//! - [`errors`]: the [`ApiError`] taxonomy

pub mod auth;
pub mod client;
pub mod codec;
pub mod errors;
pub mod interceptor;

pub use auth::{AccessTokenProvider, AnonymousTokenProvider};
pub use client::{NetworkClient, NetworkClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use interceptor::{
    AuthHeaderInterceptor, InterceptorPipeline, OutgoingRequest, RequestInterceptor,
    ResponseInterceptor, ResponseMetadata, StatusCodeInterceptor, TracingInterceptor,
};
