//! # Switchyard Core
//!
//! Core types shared by the Switchyard dispatcher and applications:
//!
//! - [`Request`] / [`Response`] / [`RequestContext`] - per-request state
//! - [`Action`] - a validated route or filter registration
//! - [`Halt`] / [`Interrupt`] - short-circuit control flow
//! - [`Fault`] / [`FaultClass`] / [`HandlerFault`] - handler errors and their hierarchy
//! - [`ResponseTransformer`] - model rendering
//! - [`SwitchyardError`] - setup and lifecycle errors

#![doc(html_root_url = "https://docs.rs/switchyard-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod context;
mod error;
mod fault;
mod halt;
mod handler;
mod request;
mod response;
mod transform;

pub use action::{Action, FilterBuilder, RouteBuilder, DEFAULT_FILTER_ACCEPT, DEFAULT_ROUTE_ACCEPT};
pub use context::{RequestContext, RequestId};
pub use error::{SwitchyardError, SwitchyardResult};
pub use fault::{Fault, FaultClass, GenericFault, HandlerFault, HandlerPanic};
pub use halt::{Halt, Interrupt};
pub use handler::{
    fault_handler, filter_handler, route_handler, FaultHandler, FilterHandler, FilterResult,
    IntoBody, RouteHandler, RouteResult,
};
pub use request::{BodyReader, Request};
pub use response::Response;
pub use transform::{transformed_handler, JsonTransformer, RenderFault, ResponseTransformer};

pub use switchyard_router::FilterPhase;
