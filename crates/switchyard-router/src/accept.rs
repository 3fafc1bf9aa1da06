//! Accept-type compatibility.
//!
//! Matching is exact-string-or-wildcard only. There is no `q=` weighting and
//! no subtype wildcard (`text/*`) negotiation.

/// Accept type that matches any request.
pub const ANY_ACCEPT: &str = "*/*";

/// Returns true if an action declared with `declared` may serve a request
/// whose `Accept` header is `requested`.
///
/// A missing `Accept` header is permissive.
///
/// ```rust
/// use switchyard_router::accept::accepts;
///
/// assert!(accepts("*/*", Some("application/json")));
/// assert!(accepts("application/json", Some("application/json")));
/// assert!(accepts("application/json", None));
/// assert!(!accepts("application/json", Some("text/html")));
/// ```
#[must_use]
pub fn accepts(declared: &str, requested: Option<&str>) -> bool {
    match requested {
        None => true,
        Some(requested) => declared == ANY_ACCEPT || declared == requested,
    }
}
