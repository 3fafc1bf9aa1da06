//! Request dispatcher.
//!
//! Every request runs through four phases in a fixed order:
//!
//! ```text
//! BEFORE ──► ROUTE ──► AFTER ──► RESPOND
//!    │          │         │
//!    └──────────┴─────────┴──► HALTED / FAULTED ──► RESPOND
//! ```
//!
//! - **BEFORE**: every matching before filter, in registration order.
//! - **ROUTE**: the single most specific route. `HEAD` falls back to a
//!   matching `GET` route without invoking it.
//! - **AFTER**: every matching after filter, in registration order.
//! - **RESPOND**: if no phase produced a body the request is either left to
//!   other handlers or answered with the 404 page.
//!
//! A [`Halt`] from any handler skips straight to RESPOND. A fault raised by
//! a route is passed to its mapped fault handler and processing continues
//! with AFTER; without a handler the 500 page is served. A fault raised by a
//! filter ends processing after its handler (or the 500 page). Panics are
//! caught and treated as [`HandlerPanic`] faults.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use http::{Method, StatusCode};
use switchyard_config::DispatchConfig;
use switchyard_core::{
    FilterPhase, Halt, HandlerFault, HandlerPanic, Interrupt, Request, RequestContext, Response,
};
use switchyard_telemetry::metrics::{record_dispatch, record_fault, DispatchOutcome};
use tracing::{debug, debug_span, error, trace};

use crate::{ErrorPages, FaultRegistry, Routes};

/// Result of a single phase.
#[derive(Debug)]
enum Outcome {
    Continue,
    Halt(Halt),
    Fault(HandlerFault),
}

impl From<Interrupt> for Outcome {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Halt(halt) => Self::Halt(halt),
            Interrupt::Fault(fault) => Self::Fault(fault),
        }
    }
}

/// How the phase loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ended {
    Completed,
    Halted,
    Faulted,
}

/// What the transport should do with a dispatched request.
#[derive(Debug)]
pub enum DispatchResult {
    /// Send this response.
    Respond(Response),
    /// Nothing produced a body; another handler may serve the request.
    NotConsumed,
}

impl DispatchResult {
    /// Returns true if a response was produced.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        matches!(self, Self::Respond(_))
    }

    /// Returns the response, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        match self {
            Self::Respond(response) => Some(response),
            Self::NotConsumed => None,
        }
    }

    /// Converts into the response, if any.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Respond(response) => Some(response),
            Self::NotConsumed => None,
        }
    }
}

/// Runs requests against a route table and a fault registry.
///
/// Cloning is cheap; clones share the same routes and fault handlers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use http::Method;
/// use switchyard_config::DispatchConfig;
/// use switchyard_core::{Action, Request, RequestContext};
/// use switchyard_pipeline::{Dispatcher, FaultRegistry, Routes};
///
/// let routes = Arc::new(Routes::new());
/// routes.add(
///     Action::route()
///         .method(Method::GET)
///         .path("/hello/:name")
///         .handler(|ctx: &mut RequestContext| {
///             Ok(format!("Hello {}", ctx.param("name").unwrap_or("?")))
///         })
///         .build()
///         .unwrap(),
/// );
///
/// let dispatcher = Dispatcher::new(routes, Arc::new(FaultRegistry::new()), &DispatchConfig::default());
/// let response = dispatcher
///     .dispatch(Request::new(Method::GET, "/hello/world"))
///     .into_response()
///     .unwrap();
/// assert_eq!(response.body(), Some("Hello world"));
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<Routes>,
    faults: Arc<FaultRegistry>,
    pages: ErrorPages,
    has_other_handlers: bool,
}

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(routes: Arc<Routes>, faults: Arc<FaultRegistry>, config: &DispatchConfig) -> Self {
        Self {
            routes,
            faults,
            pages: ErrorPages::from_config(config),
            has_other_handlers: config.has_other_handlers,
        }
    }

    /// The route table.
    #[must_use]
    pub fn routes(&self) -> &Arc<Routes> {
        &self.routes
    }

    /// The fault registry.
    #[must_use]
    pub fn faults(&self) -> &Arc<FaultRegistry> {
        &self.faults
    }

    /// Dispatches a request with a fresh request ID.
    pub fn dispatch(&self, request: Request) -> DispatchResult {
        self.dispatch_context(RequestContext::new(request))
    }

    /// Dispatches a prepared context.
    pub fn dispatch_context(&self, mut ctx: RequestContext) -> DispatchResult {
        let span = debug_span!(
            "dispatch",
            request_id = %ctx.request_id(),
            http.method = %ctx.request.method(),
            http.path = %ctx.request.path(),
        );
        let _guard = span.enter();

        let method = ctx.request.method().clone();
        let path = ctx.request.path().to_string();
        let accept = ctx.request.accept().map(str::to_string);

        let ended = self.run_phases(&mut ctx, &method, &path, accept.as_deref());
        self.respond(ctx, ended, &path)
    }

    fn run_phases(
        &self,
        ctx: &mut RequestContext,
        method: &Method,
        path: &str,
        accept: Option<&str>,
    ) -> Ended {
        match self.run_filters(FilterPhase::Before, ctx, path, accept) {
            Outcome::Continue => {}
            Outcome::Halt(halt) => return apply_halt(ctx, halt),
            Outcome::Fault(fault) => {
                self.handle_fault(ctx, fault);
                return Ended::Faulted;
            }
        }

        let mut ended = Ended::Completed;
        match self.run_route(ctx, method, path, accept) {
            Outcome::Continue => {}
            Outcome::Halt(halt) => return apply_halt(ctx, halt),
            Outcome::Fault(fault) => {
                if !self.handle_fault(ctx, fault) {
                    return Ended::Faulted;
                }
                ended = Ended::Faulted;
            }
        }

        match self.run_filters(FilterPhase::After, ctx, path, accept) {
            Outcome::Continue => ended,
            Outcome::Halt(halt) => apply_halt(ctx, halt),
            Outcome::Fault(fault) => {
                self.handle_fault(ctx, fault);
                Ended::Faulted
            }
        }
    }

    fn run_filters(
        &self,
        phase: FilterPhase,
        ctx: &mut RequestContext,
        path: &str,
        accept: Option<&str>,
    ) -> Outcome {
        for hit in self.routes.find_filters(phase, path, accept) {
            trace!(phase = %phase, filter = %hit.template, "running filter");
            ctx.set_captures(hit.params, hit.splat);

            if let Err(interrupt) = guarded(|| (hit.target)(ctx)) {
                return interrupt.into();
            }
        }
        Outcome::Continue
    }

    fn run_route(
        &self,
        ctx: &mut RequestContext,
        method: &Method,
        path: &str,
        accept: Option<&str>,
    ) -> Outcome {
        let Some(hit) = self.routes.find_route(method, path, accept) else {
            if *method == Method::HEAD && self.routes.has_route(&Method::GET, path, accept) {
                debug!("answering HEAD from GET route");
                ctx.response.set_body("");
            } else {
                debug!("no route matched");
            }
            return Outcome::Continue;
        };

        debug!(route = %hit.template, "route matched");
        ctx.set_captures(hit.params, hit.splat);

        match guarded(|| (hit.target)(ctx)) {
            Ok(Some(body)) => {
                ctx.response.set_body(body);
                Outcome::Continue
            }
            Ok(None) => Outcome::Continue,
            Err(interrupt) => interrupt.into(),
        }
    }

    /// Runs the mapped fault handler. Returns false if the 500 page was served.
    fn handle_fault(&self, ctx: &mut RequestContext, fault: HandlerFault) -> bool {
        let class = fault.class();

        let Some(handler) = self.faults.get_handler(class) else {
            error!(fault.class = %class, error = %fault, "unhandled fault");
            record_fault(class.name(), false);
            self.internal_error(ctx);
            return false;
        };

        debug!(fault.class = %class, error = %fault, "handling fault");
        record_fault(class.name(), true);

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(&fault, ctx))) {
            let panic = HandlerPanic::from_payload(&*payload);
            error!(fault.class = %class, error = %panic, "fault handler panicked");
            self.internal_error(ctx);
            return false;
        }
        true
    }

    fn internal_error(&self, ctx: &mut RequestContext) {
        ctx.response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        ctx.response.set_body(self.pages.internal_error());
    }

    fn respond(&self, mut ctx: RequestContext, ended: Ended, path: &str) -> DispatchResult {
        let outcome = if ended == Ended::Halted {
            DispatchOutcome::Halted
        } else if ctx.response.body().is_some() {
            if ended == Ended::Faulted {
                DispatchOutcome::Faulted
            } else {
                DispatchOutcome::Consumed
            }
        } else if self.has_other_handlers {
            DispatchOutcome::NotConsumed
        } else {
            debug!("route not mapped");
            ctx.response.set_status(StatusCode::NOT_FOUND);
            ctx.response.set_body(self.pages.not_found(path));
            DispatchOutcome::NotFound
        };

        let elapsed = ctx.elapsed();
        if outcome == DispatchOutcome::NotConsumed {
            debug!(outcome = %outcome, "request not consumed");
            record_dispatch(outcome, None, elapsed);
            return DispatchResult::NotConsumed;
        }

        let status = ctx.response.status().as_u16();
        debug!(
            http.status = status,
            outcome = %outcome,
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            "dispatch complete"
        );
        record_dispatch(outcome, Some(status), elapsed);
        DispatchResult::Respond(ctx.into_response())
    }
}

fn apply_halt(ctx: &mut RequestContext, halt: Halt) -> Ended {
    let (status, body) = halt.into_parts();
    debug!(http.status = status.as_u16(), "halted");
    ctx.response.set_status(status);
    ctx.response.set_body(body.unwrap_or_default());
    Ended::Halted
}

/// Invokes a handler, turning a panic into a [`HandlerPanic`] fault.
fn guarded<T>(handler: impl FnOnce() -> Result<T, Interrupt>) -> Result<T, Interrupt> {
    panic::catch_unwind(AssertUnwindSafe(handler)).unwrap_or_else(|payload| {
        Err(HandlerFault::new(HandlerPanic::from_payload(&*payload)).into())
    })
}
