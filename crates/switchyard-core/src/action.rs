//! Registered actions.
//!
//! An [`Action`] binds a handler to a method (routes) or a phase (filters), a
//! compiled path pattern and an accept type. Actions are validated once when
//! built and never mutated afterwards.

use std::fmt;

use http::Method;
use switchyard_router::{FilterPhase, PathPattern, ALL_PATHS};

use crate::handler::{filter_handler, route_handler, FilterHandler, IntoBody, RouteHandler};
use crate::{FilterResult, Interrupt, RequestContext, SwitchyardError, SwitchyardResult};

/// Accept type given to routes registered without one.
pub const DEFAULT_ROUTE_ACCEPT: &str = "*/*";

/// Accept type given to filters registered without one.
pub const DEFAULT_FILTER_ACCEPT: &str = "text/html";

/// A route or a filter, ready to be added to a route table.
#[derive(Clone)]
pub enum Action {
    /// Serves requests for one method.
    Route {
        /// HTTP method.
        method: Method,
        /// Compiled path pattern.
        pattern: PathPattern,
        /// Declared accept type.
        accept_type: String,
        /// The handler.
        handler: RouteHandler,
    },
    /// Runs before or after the route handler.
    Filter {
        /// Before or after.
        phase: FilterPhase,
        /// Compiled path pattern.
        pattern: PathPattern,
        /// Declared accept type.
        accept_type: String,
        /// The handler.
        handler: FilterHandler,
    },
}

impl Action {
    /// Starts building a route.
    #[must_use]
    pub fn route() -> RouteBuilder {
        RouteBuilder::default()
    }

    /// Starts building a before filter.
    #[must_use]
    pub fn before() -> FilterBuilder {
        FilterBuilder::new(FilterPhase::Before)
    }

    /// Starts building an after filter.
    #[must_use]
    pub fn after() -> FilterBuilder {
        FilterBuilder::new(FilterPhase::After)
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &PathPattern {
        match self {
            Self::Route { pattern, .. } | Self::Filter { pattern, .. } => pattern,
        }
    }

    /// Returns the declared accept type.
    #[must_use]
    pub fn accept_type(&self) -> &str {
        match self {
            Self::Route { accept_type, .. } | Self::Filter { accept_type, .. } => accept_type,
        }
    }

    /// Returns the method for routes, `None` for filters.
    #[must_use]
    pub const fn method(&self) -> Option<&Method> {
        match self {
            Self::Route { method, .. } => Some(method),
            Self::Filter { .. } => None,
        }
    }

    /// Returns true for filters.
    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(self, Self::Filter { .. })
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route {
                method,
                pattern,
                accept_type,
                ..
            } => f
                .debug_struct("Route")
                .field("method", method)
                .field("pattern", &pattern.template())
                .field("accept_type", accept_type)
                .finish_non_exhaustive(),
            Self::Filter {
                phase,
                pattern,
                accept_type,
                ..
            } => f
                .debug_struct("Filter")
                .field("phase", phase)
                .field("pattern", &pattern.template())
                .field("accept_type", accept_type)
                .finish_non_exhaustive(),
        }
    }
}

fn require_path(path: Option<String>) -> SwitchyardResult<PathPattern> {
    match path {
        Some(path) if !path.is_empty() => Ok(PathPattern::compile(path)),
        _ => Err(SwitchyardError::invalid_action("path must not be empty")),
    }
}

fn require_accept(accept_type: Option<String>, default: &str) -> SwitchyardResult<String> {
    match accept_type {
        None => Ok(default.to_string()),
        Some(accept) if accept.is_empty() => {
            Err(SwitchyardError::invalid_action("accept type must not be empty"))
        }
        Some(accept) => Ok(accept),
    }
}

/// Builder for [`Action::Route`].
///
/// # Example
///
/// ```
/// use switchyard_core::{Action, RequestContext};
/// use http::Method;
///
/// let action = Action::route()
///     .method(Method::GET)
///     .path("/hello/:name")
///     .handler(|ctx: &mut RequestContext| Ok(format!("Hello: {}", ctx.param("name").unwrap_or(""))))
///     .build()
///     .unwrap();
///
/// assert_eq!(action.accept_type(), "*/*");
/// assert_eq!(action.pattern().template(), "/hello/:name");
/// ```
#[derive(Default)]
pub struct RouteBuilder {
    method: Option<Method>,
    path: Option<String>,
    accept_type: Option<String>,
    handler: Option<RouteHandler>,
}

impl RouteBuilder {
    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the path template.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the accept type. Defaults to [`DEFAULT_ROUTE_ACCEPT`].
    #[must_use]
    pub fn accept_type(mut self, accept_type: impl Into<String>) -> Self {
        self.accept_type = Some(accept_type.into());
        self
    }

    /// Sets the handler from a closure.
    #[must_use]
    pub fn handler<F, B>(mut self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
        B: IntoBody,
    {
        self.handler = Some(route_handler(handler));
        self
    }

    /// Sets an already erased handler.
    #[must_use]
    pub fn erased_handler(mut self, handler: RouteHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Validates and builds the action.
    pub fn build(self) -> SwitchyardResult<Action> {
        self.build_with_default_accept(DEFAULT_ROUTE_ACCEPT)
    }

    /// Validates and builds the action, using `default_accept` when no
    /// accept type was set.
    pub fn build_with_default_accept(self, default_accept: &str) -> SwitchyardResult<Action> {
        let method = self
            .method
            .ok_or_else(|| SwitchyardError::invalid_action("route requires a method"))?;
        let pattern = require_path(self.path)?;
        let accept_type = require_accept(self.accept_type, default_accept)?;
        let handler = self
            .handler
            .ok_or_else(|| SwitchyardError::invalid_action("route requires a handler"))?;

        Ok(Action::Route {
            method,
            pattern,
            accept_type,
            handler,
        })
    }
}

/// Builder for [`Action::Filter`].
///
/// Filters without a path apply to every request.
pub struct FilterBuilder {
    phase: FilterPhase,
    path: Option<String>,
    accept_type: Option<String>,
    handler: Option<FilterHandler>,
}

impl FilterBuilder {
    fn new(phase: FilterPhase) -> Self {
        Self {
            phase,
            path: None,
            accept_type: None,
            handler: None,
        }
    }

    /// Sets the path template.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the accept type. Defaults to [`DEFAULT_FILTER_ACCEPT`].
    #[must_use]
    pub fn accept_type(mut self, accept_type: impl Into<String>) -> Self {
        self.accept_type = Some(accept_type.into());
        self
    }

    /// Sets the handler from a closure.
    #[must_use]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        self.handler = Some(filter_handler(handler));
        self
    }

    /// Sets an already erased handler.
    #[must_use]
    pub fn erased_handler(mut self, handler: FilterHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Validates and builds the action.
    pub fn build(self) -> SwitchyardResult<Action> {
        self.build_with_default_accept(DEFAULT_FILTER_ACCEPT)
    }

    /// Validates and builds the action, using `default_accept` when no
    /// accept type was set.
    pub fn build_with_default_accept(self, default_accept: &str) -> SwitchyardResult<Action> {
        let pattern = require_path(Some(self.path.unwrap_or_else(|| ALL_PATHS.to_string())))?;
        let accept_type = require_accept(self.accept_type, default_accept)?;
        let handler = self
            .handler
            .ok_or_else(|| SwitchyardError::invalid_action("filter requires a handler"))?;

        Ok(Action::Filter {
            phase: self.phase,
            pattern,
            accept_type,
            handler,
        })
    }
}
