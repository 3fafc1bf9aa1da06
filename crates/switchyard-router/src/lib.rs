//! Path patterns and specificity-ordered route matching for Switchyard.
//!
//! This crate knows nothing about handlers or requests. It compiles route
//! templates into [`PathPattern`]s, stores them in a [`RouteTable`] keyed by
//! HTTP method (routes) or [`FilterPhase`] (filters), and answers two
//! questions:
//!
//! - which single route best serves a `(method, path, accept)` triple, and
//! - which filters of a phase apply to a `(path, accept)` pair.
//!
//! # Template syntax
//!
//! | Segment   | Matches                                          |
//! |-----------|--------------------------------------------------|
//! | `books`   | exactly `books` (case-sensitive)                 |
//! | `:id`     | any one segment, captured as `:id`               |
//! | `*`       | one segment, or the whole remainder when trailing |
//!
//! When several routes match, literal beats param beats splat at the first
//! differing position; remaining ties go to the earliest registration.
//!
//! # Example
//!
//! ```rust
//! use switchyard_router::{FilterPhase, PathPattern, RouteTable, ANY_ACCEPT};
//! use http::Method;
//!
//! let mut table: RouteTable<&str> = RouteTable::new();
//! table.add_route(Method::GET, PathPattern::compile("/hello/:name"), ANY_ACCEPT, "hello");
//! table.add_filter(FilterPhase::Before, PathPattern::all_paths(), ANY_ACCEPT, "auth");
//!
//! let found = table.find_target(&Method::GET, "/hello/world", None).unwrap();
//! assert_eq!(*found.target, "hello");
//! assert_eq!(found.params.get("name"), Some("world"));
//!
//! let filters = table.find_targets(FilterPhase::Before, "/hello/world", None);
//! assert_eq!(filters.len(), 1);
//! ```

pub mod accept;
mod params;
mod pattern;
mod table;

pub use accept::{accepts, ANY_ACCEPT};
pub use params::{Captures, Params};
pub use pattern::{split_path, PathPattern, Segment, ALL_PATHS};
pub use table::{Entry, FilterPhase, RouteTable};

/// A matched route or filter with its extracted captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The registered target.
    pub target: &'a T,
    /// Template the target was registered with.
    pub template: &'a str,
    /// The request path that was matched.
    pub path: String,
    /// Extracted path parameters.
    pub params: Params,
    /// Splat captures, in pattern order.
    pub splat: Vec<String>,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(path: &str, template: &'a str, target: &'a T, captures: Captures) -> Self {
        Self {
            target,
            template,
            path: path.to_string(),
            params: captures.params,
            splat: captures.splat,
        }
    }

    /// Returns a path parameter by name (with or without leading colon).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Maps the borrowed target into an owned value.
    ///
    /// Used by callers that must release the table before invoking the target.
    pub fn map_target<U>(self, f: impl FnOnce(&T) -> U) -> OwnedMatch<U> {
        OwnedMatch {
            target: f(self.target),
            template: self.template.to_string(),
            path: self.path,
            params: self.params,
            splat: self.splat,
        }
    }
}

/// A route match that owns its target and template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedMatch<T> {
    /// The target.
    pub target: T,
    /// Template the target was registered with.
    pub template: String,
    /// The request path that was matched.
    pub path: String,
    /// Extracted path parameters.
    pub params: Params,
    /// Splat captures, in pattern order.
    pub splat: Vec<String>,
}
