//! # Switchyard Test
//!
//! In-memory testing for Switchyard applications. Requests are built with an
//! `http`-style builder, converted the same way the HTTP adapter converts
//! them, and dispatched synchronously. No sockets are opened.
//!
//! ## Example
//!
//! ```
//! use switchyard::prelude::*;
//! use switchyard_test::TestClient;
//!
//! let app = Switchyard::new();
//! app.get("/users/:id", |ctx: &mut RequestContext| {
//!     Ok(format!(r#"{{"id":"{}"}}"#, ctx.param(":id").unwrap_or_default()))
//! })
//! .unwrap();
//!
//! let client = TestClient::new(app);
//! let response = client.get("/users/123").accept("application/json").send();
//!
//! response
//!     .assert_status(StatusCode::OK)
//!     .assert_json_field("id", &serde_json::json!("123"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
