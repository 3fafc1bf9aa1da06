//! The decoded request seen by handlers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use switchyard_router::Params;

use crate::{SwitchyardError, SwitchyardResult};

/// Produces the request body on first access.
pub type BodyReader = Box<dyn FnOnce() -> io::Result<Bytes> + Send>;

enum BodyState {
    Ready(Bytes),
    Pending(BodyReader),
    Failed(io::ErrorKind),
}

impl fmt::Debug for BodyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(bytes) => f.debug_tuple("Ready").field(&bytes.len()).finish(),
            Self::Pending(_) => f.write_str("Pending"),
            Self::Failed(kind) => f.debug_tuple("Failed").field(kind).finish(),
        }
    }
}

/// An incoming request, already decoded by the transport.
///
/// Route params and splats are rewritten before each handler runs, so a
/// filter registered on `/books/*` and a route registered on `/books/:id` each
/// see their own captures.
///
/// # Example
///
/// ```
/// use switchyard_core::Request;
/// use http::Method;
///
/// let mut request = Request::new(Method::POST, "/books")
///     .with_query("page=2&sort=title")
///     .with_accept("application/json")
///     .with_body("hello");
///
/// assert_eq!(request.query_param("page").as_deref(), Some("2"));
/// assert_eq!(request.accept(), Some("application/json"));
/// assert_eq!(request.body_str().unwrap(), "hello");
/// ```
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    accept: Option<String>,
    headers: HeaderMap,
    body: BodyState,
    params: Params,
    splat: Vec<String>,
    attributes: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Request {
    /// Creates a request with an empty body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            accept: None,
            headers: HeaderMap::new(),
            body: BodyState::Ready(Bytes::new()),
            params: Params::new(),
            splat: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Creates a request from a path that may carry a `?query` suffix.
    #[must_use]
    pub fn from_target(method: Method, target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self::new(method, path).with_query(query),
            None => Self::new(method, target),
        }
    }

    /// Sets the raw query string (without the `?`).
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    /// Sets the `Accept` value used for action selection.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Replaces the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets an in-memory body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = BodyState::Ready(body.into());
        self
    }

    /// Sets a body that is read on first access and memoized.
    #[must_use]
    pub fn with_body_reader<F>(mut self, reader: F) -> Self
    where
        F: FnOnce() -> io::Result<Bytes> + Send + 'static,
    {
        self.body = BodyState::Pending(Box::new(reader));
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the `Accept` value, if the client sent one.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns mutable request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the body bytes, reading them on first call.
    pub fn body_bytes(&mut self) -> SwitchyardResult<Bytes> {
        let state = std::mem::replace(&mut self.body, BodyState::Ready(Bytes::new()));
        let (state, result) = match state {
            BodyState::Ready(bytes) => (BodyState::Ready(bytes.clone()), Ok(bytes)),
            BodyState::Pending(reader) => match reader() {
                Ok(bytes) => (BodyState::Ready(bytes.clone()), Ok(bytes)),
                Err(err) => (
                    BodyState::Failed(err.kind()),
                    Err(SwitchyardError::BodyRead(err)),
                ),
            },
            BodyState::Failed(kind) => (
                BodyState::Failed(kind),
                Err(SwitchyardError::BodyRead(io::Error::from(kind))),
            ),
        };
        self.body = state;
        result
    }

    /// Returns the body as UTF-8 text.
    pub fn body_str(&mut self) -> SwitchyardResult<String> {
        let bytes = self.body_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| SwitchyardError::InvalidBody {
            message: e.to_string(),
        })
    }

    /// Deserializes the body as JSON.
    pub fn body_json<T: DeserializeOwned>(&mut self) -> SwitchyardResult<T> {
        let bytes = self.body_bytes()?;
        serde_json::from_slice(&bytes).map_err(|e| SwitchyardError::InvalidBody {
            message: e.to_string(),
        })
    }

    /// Returns the raw query string.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decodes the query string into `(name, value)` pairs.
    ///
    /// An undecodable query string yields no pairs.
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default()
    }

    /// Returns the first value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_params()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Deserializes the query string into `T`.
    pub fn query<T: DeserializeOwned>(&self) -> SwitchyardResult<T> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or("")).map_err(|e| {
            SwitchyardError::InvalidQuery {
                message: e.to_string(),
            }
        })
    }

    /// Returns a route parameter, with or without the leading colon.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns all route parameters of the running handler.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the splat captures of the running handler.
    #[must_use]
    pub fn splat(&self) -> &[String] {
        &self.splat
    }

    /// Replaces the route captures for the next handler.
    pub fn set_captures(&mut self, params: Params, splat: Vec<String>) {
        self.params = params;
        self.splat = splat;
    }

    /// Stores a request attribute, replacing any previous value.
    pub fn set_attribute<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.attributes.insert(name.into(), Box::new(value));
    }

    /// Returns a request attribute if present and of type `T`.
    #[must_use]
    pub fn attribute<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Removes a request attribute. Returns true if it existed.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        self.attributes.remove(name).is_some()
    }

    /// Iterates over attribute names.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("accept", &self.accept)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("params", &self.params)
            .field("splat", &self.splat)
            .finish_non_exhaustive()
    }
}
