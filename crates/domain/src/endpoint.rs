//! Endpoint descriptors
//!
//! An [`Endpoint`] declares one API call: where it goes, how it is
//! authenticated and which request/response types travel with it. The
//! associated types tie the response type to the descriptor at compile time,
//! so a client can only ever decode what the endpoint declares.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key naming on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireKeys {
    /// snake_case on the wire, camelCase in memory (the backend)
    #[default]
    SnakeCase,
    /// Keys are sent and read exactly as the models name them
    Verbatim,
}

/// Request body encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/json`
    #[default]
    Json,
    /// `application/x-www-form-urlencoded` from the top-level object
    Form,
}

/// Declarative description of one API call
///
/// Only [`Endpoint::path`] is mandatory; every other method has the default
/// used by most backend calls (GET, no auth, snake_case JSON).
///
/// ```
/// use std::borrow::Cow;
///
/// use beautywiki_domain::{Endpoint, HttpMethod};
///
/// struct Ping;
///
/// impl Endpoint for Ping {
///     type Request = ();
///     type Response = serde_json::Value;
///
///     fn path(&self) -> Cow<'_, str> {
///         Cow::Borrowed("/api/ping")
///     }
/// }
///
/// assert_eq!(Ping.method(), HttpMethod::Get);
/// assert!(!Ping.requires_auth());
/// ```
pub trait Endpoint: Send + Sync {
    /// Body type sent with the request (`()` when there is none)
    type Request: Serialize + Send + Sync;

    /// Type the response body decodes into
    type Response: DeserializeOwned + Send;

    /// Path appended to the base URL; must not carry a query string
    fn path(&self) -> Cow<'_, str>;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    /// Whether the call needs a bearer token
    fn requires_auth(&self) -> bool {
        false
    }

    /// Headers merged over the client defaults
    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Base URL override; `None` uses the client default
    fn base_url(&self) -> Option<&str> {
        None
    }

    /// Third-party API that must never receive the bearer token
    fn is_external(&self) -> bool {
        false
    }

    fn wire_keys(&self) -> WireKeys {
        WireKeys::SnakeCase
    }

    fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::Json
    }
}
