//! Route table and matcher.
//!
//! The [`RouteTable`] stores registered entries in per-method buckets (routes)
//! and per-phase buckets (filters), always in insertion order. Lookups are a
//! linear scan over the relevant bucket: route tables are small and built once,
//! and the scan is what makes "earliest registration wins" trivial to honour.

use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::accept::accepts;
use crate::pattern::PathPattern;
use crate::RouteMatch;

/// The two filter pseudo-methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPhase {
    /// Runs before the route handler.
    Before,
    /// Runs after the route handler.
    After,
}

impl FilterPhase {
    /// Lower-case name of the phase (`before` / `after`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for FilterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered pattern, its accept type and the target it resolves to.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pattern: PathPattern,
    accept_type: String,
    target: T,
}

impl<T> Entry<T> {
    /// Creates a new entry.
    pub fn new(pattern: PathPattern, accept_type: impl Into<String>, target: T) -> Self {
        Self {
            pattern,
            accept_type: accept_type.into(),
            target,
        }
    }

    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the declared accept type.
    pub fn accept_type(&self) -> &str {
        &self.accept_type
    }

    /// Returns the target.
    pub fn target(&self) -> &T {
        &self.target
    }

    fn try_match<'a>(&'a self, path: &str, accept: Option<&str>) -> Option<RouteMatch<'a, T>> {
        if !accepts(&self.accept_type, accept) {
            return None;
        }
        let captures = self.pattern.matches(path)?;
        Some(RouteMatch::new(
            path,
            self.pattern.template(),
            &self.target,
            captures,
        ))
    }
}

/// Route and filter storage with specificity-ordered lookup.
///
/// # Example
///
/// ```rust
/// use switchyard_router::{PathPattern, RouteTable};
/// use http::Method;
///
/// let mut table: RouteTable<&str> = RouteTable::new();
/// table.add_route(Method::GET, PathPattern::compile("/users/:id"), "*/*", "getUser");
/// table.add_route(Method::GET, PathPattern::compile("/users/me"), "*/*", "getMe");
///
/// let found = table.find_target(&Method::GET, "/users/me", None).unwrap();
/// assert_eq!(*found.target, "getMe");
///
/// let found = table.find_target(&Method::GET, "/users/42", None).unwrap();
/// assert_eq!(*found.target, "getUser");
/// assert_eq!(found.params.get("id"), Some("42"));
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<R, F = R> {
    routes: HashMap<Method, Vec<Entry<R>>>,
    before: Vec<Entry<F>>,
    after: Vec<Entry<F>>,
}

impl<R, F> Default for RouteTable<R, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, F> RouteTable<R, F> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Appends a route under its method bucket.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: PathPattern,
        accept_type: impl Into<String>,
        target: R,
    ) {
        self.routes
            .entry(method)
            .or_default()
            .push(Entry::new(pattern, accept_type, target));
    }

    /// Appends a filter under its phase bucket.
    pub fn add_filter(
        &mut self,
        phase: FilterPhase,
        pattern: PathPattern,
        accept_type: impl Into<String>,
        target: F,
    ) {
        self.filters_mut(phase)
            .push(Entry::new(pattern, accept_type, target));
    }

    fn filters(&self, phase: FilterPhase) -> &[Entry<F>] {
        match phase {
            FilterPhase::Before => &self.before,
            FilterPhase::After => &self.after,
        }
    }

    fn filters_mut(&mut self, phase: FilterPhase) -> &mut Vec<Entry<F>> {
        match phase {
            FilterPhase::Before => &mut self.before,
            FilterPhase::After => &mut self.after,
        }
    }

    /// Finds the single best route for a request.
    ///
    /// Among all structurally and accept-compatible routes the most specific
    /// pattern wins; ties go to the earliest registration.
    #[must_use]
    pub fn find_target(
        &self,
        method: &Method,
        path: &str,
        accept: Option<&str>,
    ) -> Option<RouteMatch<'_, R>> {
        let bucket = self.routes.get(method)?;

        let mut best: Option<(&PathPattern, RouteMatch<'_, R>)> = None;
        for entry in bucket {
            let Some(found) = entry.try_match(path, accept) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => entry.pattern.specificity_cmp(current).is_gt(),
            };
            if better {
                best = Some((&entry.pattern, found));
            }
        }

        best.map(|(_, found)| found)
    }

    /// Returns true if some route would serve the request.
    #[must_use]
    pub fn contains(&self, method: &Method, path: &str, accept: Option<&str>) -> bool {
        self.routes.get(method).is_some_and(|bucket| {
            bucket
                .iter()
                .any(|e| accepts(&e.accept_type, accept) && e.pattern.matches(path).is_some())
        })
    }

    /// Finds every filter of `phase` that matches, in registration order.
    #[must_use]
    pub fn find_targets(
        &self,
        phase: FilterPhase,
        path: &str,
        accept: Option<&str>,
    ) -> Vec<RouteMatch<'_, F>> {
        self.filters(phase)
            .iter()
            .filter_map(|entry| entry.try_match(path, accept))
            .collect()
    }

    /// Removes routes registered with the exact template `path`.
    ///
    /// With `Some(method)` only that bucket is searched. Returns true if at
    /// least one route was removed.
    pub fn remove(&mut self, path: &str, method: Option<&Method>) -> bool {
        let mut removed = false;
        for (bucket_method, bucket) in &mut self.routes {
            if method.is_some_and(|m| m != bucket_method) {
                continue;
            }
            let before = bucket.len();
            bucket.retain(|e| e.pattern.template() != path);
            removed |= bucket.len() != before;
        }
        self.routes.retain(|_, bucket| !bucket.is_empty());
        removed
    }

    /// Removes every route and filter.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.before.clear();
        self.after.clear();
    }

    /// Iterates over registered routes as `(method, entry)`.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &Entry<R>)> {
        self.routes
            .iter()
            .flat_map(|(method, bucket)| bucket.iter().map(move |e| (method, e)))
    }

    /// Number of routes (filters excluded).
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Number of filters across both phases.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Total number of routes and filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count() + self.filter_count()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
