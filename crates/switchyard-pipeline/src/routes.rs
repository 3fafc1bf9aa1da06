//! Shared route table with a serving guard.

use std::sync::atomic::{AtomicBool, Ordering};

use http::Method;
use parking_lot::RwLock;
use switchyard_core::{
    Action, FilterHandler, FilterPhase, RouteHandler, SwitchyardError, SwitchyardResult,
};
use switchyard_router::{OwnedMatch, RouteTable};
use tracing::debug;

/// A matched route handler.
pub type RouteHit = OwnedMatch<RouteHandler>;

/// A matched filter handler.
pub type FilterHit = OwnedMatch<FilterHandler>;

/// Route and filter registrations shared by the application and the dispatcher.
///
/// Lookups clone the matched handler out of the table so no lock is held
/// while user code runs. Clearing and removal are refused while serving.
#[derive(Default)]
pub struct Routes {
    table: RwLock<RouteTable<RouteHandler, FilterHandler>>,
    serving: AtomicBool,
}

impl Routes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route or filter.
    pub fn add(&self, action: Action) {
        debug!(action = ?action, "registering action");

        let mut table = self.table.write();
        match action {
            Action::Route {
                method,
                pattern,
                accept_type,
                handler,
            } => table.add_route(method, pattern, accept_type, handler),
            Action::Filter {
                phase,
                pattern,
                accept_type,
                handler,
            } => table.add_filter(phase, pattern, accept_type, handler),
        }
    }

    /// Finds the best route for a request.
    #[must_use]
    pub fn find_route(&self, method: &Method, path: &str, accept: Option<&str>) -> Option<RouteHit> {
        self.table
            .read()
            .find_target(method, path, accept)
            .map(|found| found.map_target(RouteHandler::clone))
    }

    /// Finds every filter of `phase` for a request, in registration order.
    #[must_use]
    pub fn find_filters(&self, phase: FilterPhase, path: &str, accept: Option<&str>) -> Vec<FilterHit> {
        self.table
            .read()
            .find_targets(phase, path, accept)
            .into_iter()
            .map(|found| found.map_target(FilterHandler::clone))
            .collect()
    }

    /// Returns true if some route would serve the request.
    #[must_use]
    pub fn has_route(&self, method: &Method, path: &str, accept: Option<&str>) -> bool {
        self.table.read().contains(method, path, accept)
    }

    /// Removes every route and filter.
    pub fn clear(&self) -> SwitchyardResult<()> {
        self.ensure_stopped("clear routes")?;
        self.table.write().clear();
        Ok(())
    }

    /// Removes routes registered with exactly `path`, optionally only for `method`.
    pub fn remove(&self, path: &str, method: Option<&Method>) -> SwitchyardResult<bool> {
        self.ensure_stopped("remove routes")?;
        Ok(self.table.write().remove(path, method))
    }

    /// Lists `(method, template, accept type)` for each route.
    #[must_use]
    pub fn describe(&self) -> Vec<(Method, String, String)> {
        let table = self.table.read();
        let mut routes: Vec<_> = table
            .routes()
            .map(|(method, entry)| {
                (
                    method.clone(),
                    entry.pattern().template().to_string(),
                    entry.accept_type().to_string(),
                )
            })
            .collect();
        routes.sort_by(|a, b| (a.1.as_str(), a.0.as_str()).cmp(&(b.1.as_str(), b.0.as_str())));
        routes
    }

    /// Number of routes and filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Marks the table as serving (or not).
    pub fn set_serving(&self, serving: bool) {
        self.serving.store(serving, Ordering::SeqCst);
    }

    /// Returns true while serving.
    #[must_use]
    pub fn is_serving(&self) -> bool {
        self.serving.load(Ordering::SeqCst)
    }

    fn ensure_stopped(&self, operation: &str) -> SwitchyardResult<()> {
        if self.is_serving() {
            return Err(SwitchyardError::illegal_state(format!(
                "cannot {operation} while serving"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Routes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.read();
        f.debug_struct("Routes")
            .field("routes", &table.route_count())
            .field("filters", &table.filter_count())
            .field("serving", &self.is_serving())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::{Request, RequestContext};

    fn route(method: Method, path: &str, body: &'static str) -> Action {
        Action::route()
            .method(method)
            .path(path)
            .handler(move |_ctx: &mut RequestContext| Ok(body))
            .build()
            .unwrap()
    }

    fn invoke(hit: &RouteHit) -> Option<String> {
        let mut ctx = RequestContext::new(Request::new(Method::GET, hit.path.clone()));
        (hit.target)(&mut ctx).unwrap()
    }

    #[test]
    fn test_add_and_find_route() {
        let routes = Routes::new();
        routes.add(route(Method::GET, "/hello/:name", "hi"));

        let hit = routes.find_route(&Method::GET, "/hello/bob", None).unwrap();
        assert_eq!(hit.template, "/hello/:name");
        assert_eq!(hit.params.get("name"), Some("bob"));
        assert_eq!(invoke(&hit).as_deref(), Some("hi"));

        assert!(routes.find_route(&Method::POST, "/hello/bob", None).is_none());
    }

    #[test]
    fn test_find_filters_in_order() {
        let routes = Routes::new();
        for accept in ["*/*", "*/*"] {
            routes.add(
                Action::before()
                    .accept_type(accept)
                    .handler(|_ctx| Ok(()))
                    .build()
                    .unwrap(),
            );
        }
        routes.add(
            Action::after()
                .path("/x")
                .handler(|_ctx| Ok(()))
                .build()
                .unwrap(),
        );

        assert_eq!(routes.find_filters(FilterPhase::Before, "/any", None).len(), 2);
        assert_eq!(routes.find_filters(FilterPhase::After, "/x", None).len(), 1);
        assert!(routes.find_filters(FilterPhase::After, "/y", None).is_empty());
    }

    #[test]
    fn test_clear_refused_while_serving() {
        let routes = Routes::new();
        routes.add(route(Method::GET, "/a", "a"));
        routes.set_serving(true);

        let err = routes.clear().unwrap_err();
        assert!(err.is_illegal_state());
        assert!(routes.remove("/a", None).unwrap_err().is_illegal_state());
        assert_eq!(routes.len(), 1);

        routes.set_serving(false);
        routes.clear().unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_remove_by_method() {
        let routes = Routes::new();
        routes.add(route(Method::GET, "/a", "get"));
        routes.add(route(Method::POST, "/a", "post"));

        assert!(routes.remove("/a", Some(&Method::POST)).unwrap());
        assert!(!routes.has_route(&Method::POST, "/a", None));
        assert!(routes.has_route(&Method::GET, "/a", None));
        assert!(!routes.remove("/missing", None).unwrap());
    }

    #[test]
    fn test_describe_sorted() {
        let routes = Routes::new();
        routes.add(route(Method::POST, "/b", "b"));
        routes.add(route(Method::GET, "/a", "a"));

        let described = routes.describe();
        assert_eq!(described[0].1, "/a");
        assert_eq!(described[1], (Method::POST, "/b".to_string(), "*/*".to_string()));
    }
}
