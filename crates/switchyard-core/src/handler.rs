//! Handler types.
//!
//! Handlers are plain closures stored behind `Arc` so the route table can be
//! read concurrently while handlers are cloned out of it.

use std::sync::Arc;

use crate::{HandlerFault, Interrupt, RequestContext};

/// Result of a route handler: `Some(body)`, or `None` for "not consumed".
pub type RouteResult = Result<Option<String>, Interrupt>;

/// Result of a filter handler.
pub type FilterResult = Result<(), Interrupt>;

/// A type-erased route handler.
pub type RouteHandler = Arc<dyn Fn(&mut RequestContext) -> RouteResult + Send + Sync>;

/// A type-erased before/after filter.
pub type FilterHandler = Arc<dyn Fn(&mut RequestContext) -> FilterResult + Send + Sync>;

/// A type-erased fault handler.
pub type FaultHandler = Arc<dyn Fn(&HandlerFault, &mut RequestContext) + Send + Sync>;

/// Values a route handler may return as its body.
pub trait IntoBody {
    /// Converts into an optional body.
    fn into_body(self) -> Option<String>;
}

impl IntoBody for String {
    fn into_body(self) -> Option<String> {
        Some(self)
    }
}

impl IntoBody for &'static str {
    fn into_body(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoBody for Option<String> {
    fn into_body(self) -> Option<String> {
        self
    }
}

/// Returning `()` leaves the body to whatever the handler wrote to the response.
impl IntoBody for () {
    fn into_body(self) -> Option<String> {
        None
    }
}

/// Erases a route closure.
///
/// ```
/// use switchyard_core::{route_handler, Request, RequestContext};
/// use http::Method;
///
/// let handler = route_handler(|ctx: &mut RequestContext| {
///     Ok(format!("Hello: {}", ctx.param("name").unwrap_or("?")))
/// });
///
/// let mut ctx = RequestContext::new(Request::new(Method::GET, "/hello"));
/// assert_eq!(handler(&mut ctx).unwrap().as_deref(), Some("Hello: ?"));
/// ```
pub fn route_handler<F, B>(handler: F) -> RouteHandler
where
    F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
    B: IntoBody,
{
    Arc::new(move |ctx: &mut RequestContext| handler(ctx).map(IntoBody::into_body))
}

/// Erases a filter closure.
pub fn filter_handler<F>(handler: F) -> FilterHandler
where
    F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Erases a fault handler closure.
pub fn fault_handler<F>(handler: F) -> FaultHandler
where
    F: Fn(&HandlerFault, &mut RequestContext) + Send + Sync + 'static,
{
    Arc::new(handler)
}
