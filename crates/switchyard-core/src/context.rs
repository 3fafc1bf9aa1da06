//! Per-request context.
//!
//! A [`RequestContext`] is created by the dispatcher for every request and
//! handed mutably to each before filter, the route handler, each after filter
//! and any fault handler, in that order.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use switchyard_router::Params;
use uuid::Uuid;

use crate::{Request, Response};

/// A unique, time-ordered request identifier (UUID v7).
///
/// # Example
///
/// ```
/// use switchyard_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID, e.g. one propagated from an upstream header.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// State shared by every handler that runs for one request.
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    /// The incoming request.
    pub request: Request,
    /// The response under construction.
    pub response: Response,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and an empty 200 response.
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self::with_request_id(RequestId::new(), request)
    }

    /// Creates a context with the given request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId, request: Request) -> Self {
        Self {
            request_id,
            request,
            response: Response::new(),
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Shorthand for `self.request.param(name)`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    /// Shorthand for `self.request.splat()`.
    #[must_use]
    pub fn splat(&self) -> &[String] {
        self.request.splat()
    }

    /// Installs the captures of the handler about to run.
    pub fn set_captures(&mut self, params: Params, splat: Vec<String>) {
        self.request.set_captures(params, splat);
    }

    /// Time elapsed since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Splits the context into its response.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}
