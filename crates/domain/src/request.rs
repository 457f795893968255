//! Request envelope

use std::fmt;

use crate::endpoint::Endpoint;

/// One call to an [`Endpoint`]: descriptor, optional body, optional explicit
/// bearer token and ordered query items.
///
/// Built with consuming `with_*` methods and immutable afterwards, so the
/// same envelope can be sent (and retried) any number of times.
///
/// ```
/// # use std::borrow::Cow;
/// # use beautywiki_domain::{ApiRequest, Endpoint};
/// # struct Articles;
/// # impl Endpoint for Articles {
/// #     type Request = ();
/// #     type Response = serde_json::Value;
/// #     fn path(&self) -> Cow<'_, str> { Cow::Borrowed("/api/articles") }
/// # }
/// let request = ApiRequest::new(Articles).with_query("page", "2").with_query("per_page", "20");
/// assert_eq!(request.query_items()[0], ("page".to_string(), "2".to_string()));
/// ```
pub struct ApiRequest<E: Endpoint> {
    endpoint: E,
    body: Option<E::Request>,
    auth_token: Option<String>,
    query_items: Vec<(String, String)>,
}

impl<E: Endpoint> ApiRequest<E> {
    #[must_use]
    pub fn new(endpoint: E) -> Self {
        Self { endpoint, body: None, auth_token: None, query_items: Vec::new() }
    }

    #[must_use]
    pub fn with_body(mut self, body: E::Request) -> Self {
        self.body = Some(body);
        self
    }

    /// Use `token` instead of the managed session token
    ///
    /// A request carrying an explicit token is never retried on 401.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Append one query item (order is preserved)
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_items.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_query_items<I, K, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_items.extend(items.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub const fn body(&self) -> Option<&E::Request> {
        self.body.as_ref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn query_items(&self) -> &[(String, String)] {
        &self.query_items
    }
}

impl<E> Clone for ApiRequest<E>
where
    E: Endpoint + Clone,
    E::Request: Clone,
{
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            body: self.body.clone(),
            auth_token: self.auth_token.clone(),
            query_items: self.query_items.clone(),
        }
    }
}

impl<E> fmt::Debug for ApiRequest<E>
where
    E: Endpoint,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.endpoint.method())
            .field("path", &self.endpoint.path())
            .field("has_body", &self.body.is_some())
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("query_items", &self.query_items)
            .finish()
    }
}
