//! # Switchyard Pipeline
//!
//! Request dispatch for Switchyard.
//!
//! ```text
//! Request → BEFORE filters → ROUTE → AFTER filters → Response
//!                 │             │          │
//!                 └── Halt / Fault ────────┴──► FaultRegistry / 500 page
//! ```
//!
//! - [`Routes`] - the shared route table, guarded against changes while serving
//! - [`Dispatcher`] - runs the phases for one request
//! - [`FaultRegistry`] - maps fault classes to handlers, walking parent classes
//! - [`ErrorPages`] - the 404 and 500 bodies

#![doc(html_root_url = "https://docs.rs/switchyard-pipeline/0.1.0")]
#![warn(missing_docs)]

mod dispatcher;
mod faults;
mod pages;
mod routes;

pub use dispatcher::{DispatchResult, Dispatcher};
pub use faults::FaultRegistry;
pub use pages::{ErrorPages, PATH_PLACEHOLDER};
pub use routes::{FilterHit, RouteHit, Routes};
