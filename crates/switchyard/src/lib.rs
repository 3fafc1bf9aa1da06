//! # Switchyard
//!
//! **A small synchronous HTTP router with before/after filters and fault mapping**
//!
//! - **Pattern routing** – literal, `:param` and `*` splat segments; the most
//!   specific route wins
//! - **Filters** – before and after filters on any path, run in registration order
//! - **Halt** – stop any request from any handler with a status and body
//! - **Fault mapping** – map handler errors, and their parent classes, to handlers
//! - **Transport agnostic** – dispatch plain values or `http` requests
//!
//! ## Quick Start
//!
//! ```
//! use switchyard::prelude::*;
//!
//! # fn main() -> SwitchyardResult<()> {
//! let app = Switchyard::new();
//!
//! app.before_path("/admin/*", |ctx: &mut RequestContext| {
//!     if ctx.request.header("authorization").is_none() {
//!         return Err(Halt::with_body(StatusCode::UNAUTHORIZED, "Go Away!").into());
//!     }
//!     Ok(())
//! })?;
//! app.get("/hello/:name", |ctx: &mut RequestContext| {
//!     Ok(format!("Hello: {}", ctx.param("name").unwrap_or_default()))
//! })?;
//!
//! app.start()?;
//! let response = app
//!     .dispatch(Request::new(Method::GET, "/admin/users"))
//!     .into_response()
//!     .unwrap();
//! assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → BEFORE filters → ROUTE → AFTER filters → Response
//!                 │             │          │
//!                 └── Halt / Fault ────────┴──► fault handler / 500 page
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard/0.1.0")]
#![warn(missing_docs)]

pub mod adapter;
mod app;
pub mod global;

pub use app::Switchyard;

// Re-export core types
pub use switchyard_core as core;

// Re-export router types
pub use switchyard_router as router;

// Re-export dispatch types
pub use switchyard_pipeline as pipeline;

// Re-export configuration types
pub use switchyard_config as config;

// Re-export telemetry types
pub use switchyard_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Switchyard;

    pub use switchyard_core::{
        Action, Fault, FaultClass, FilterPhase, GenericFault, Halt, HandlerFault, HandlerPanic,
        Interrupt, JsonTransformer, Request, RequestContext, RequestId, Response,
        ResponseTransformer, SwitchyardError, SwitchyardResult,
    };

    pub use switchyard_pipeline::DispatchResult;

    pub use switchyard_config::{ConfigLoader, SwitchyardConfig};

    pub use ::http::{Method, StatusCode};
}
