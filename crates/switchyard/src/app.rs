//! The application object.

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use switchyard_config::SwitchyardConfig;
use switchyard_core::{
    transformed_handler, Action, Fault, FilterResult, HandlerFault, Interrupt, IntoBody,
    JsonTransformer, Request, RequestContext, ResponseTransformer, SwitchyardError,
    SwitchyardResult,
};
use switchyard_pipeline::{DispatchResult, Dispatcher, FaultRegistry, Routes};
use switchyard_telemetry::TelemetryResult;
use tracing::info;

macro_rules! method_routes {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<F, B>(&self, path: &str, handler: F) -> SwitchyardResult<&Self>
            where
                F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
                B: IntoBody,
            {
                self.route(Method::$method, path, handler)
            }
        )*
    };
}

/// A router instance: routes, filters, fault handlers and configuration.
///
/// Clones share the same registrations.
///
/// # Example
///
/// ```
/// use switchyard::prelude::*;
///
/// # fn main() -> SwitchyardResult<()> {
/// let app = Switchyard::new();
/// app.get("/hello/:name", |ctx: &mut RequestContext| {
///     Ok(format!("Hello: {}", ctx.param("name").unwrap_or_default()))
/// })?;
///
/// let response = app
///     .dispatch(Request::new(Method::GET, "/hello/world"))
///     .into_response()
///     .unwrap();
/// assert_eq!(response.body(), Some("Hello: world"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Switchyard {
    config: Arc<SwitchyardConfig>,
    dispatcher: Dispatcher,
}

impl Default for Switchyard {
    fn default() -> Self {
        Self::new()
    }
}

impl Switchyard {
    /// Creates an instance with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SwitchyardConfig::default())
    }

    /// Creates an instance with the given configuration.
    #[must_use]
    pub fn with_config(config: SwitchyardConfig) -> Self {
        let dispatcher = Dispatcher::new(
            Arc::new(Routes::new()),
            Arc::new(FaultRegistry::new()),
            &config.dispatch,
        );
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// The configuration this instance was built with.
    #[must_use]
    pub fn config(&self) -> &SwitchyardConfig {
        &self.config
    }

    /// Installs the global `tracing` subscriber from the logging section.
    pub fn init_telemetry(&self) -> TelemetryResult<()> {
        switchyard_telemetry::init_telemetry(&self.config.log_config())
    }

    /// Registers a route for `method` with the configured default accept type.
    pub fn route<F, B>(&self, method: Method, path: &str, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
        B: IntoBody,
    {
        let action = Action::route()
            .method(method)
            .path(path)
            .handler(handler)
            .build_with_default_accept(&self.config.dispatch.default_route_accept_type)?;
        self.add_action(action)
    }

    /// Registers a route that only serves requests accepting `accept_type`.
    pub fn route_with_accept<F, B>(
        &self,
        method: Method,
        path: &str,
        accept_type: &str,
        handler: F,
    ) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
        B: IntoBody,
    {
        let action = Action::route()
            .method(method)
            .path(path)
            .accept_type(accept_type)
            .handler(handler)
            .build()?;
        self.add_action(action)
    }

    method_routes! {
        /// Registers a `GET` route.
        get => GET;
        /// Registers a `POST` route.
        post => POST;
        /// Registers a `PUT` route.
        put => PUT;
        /// Registers a `PATCH` route.
        patch => PATCH;
        /// Registers a `DELETE` route.
        delete => DELETE;
        /// Registers a `HEAD` route.
        head => HEAD;
        /// Registers an `OPTIONS` route.
        options => OPTIONS;
        /// Registers a `TRACE` route.
        trace => TRACE;
        /// Registers a `CONNECT` route.
        connect => CONNECT;
    }

    /// Registers a route whose model is rendered by `transformer`.
    pub fn route_transformed<T, F, M>(
        &self,
        method: Method,
        path: &str,
        transformer: T,
        handler: F,
    ) -> SwitchyardResult<&Self>
    where
        T: ResponseTransformer,
        F: Fn(&mut RequestContext) -> Result<M, Interrupt> + Send + Sync + 'static,
        M: Serialize,
    {
        let action = Action::route()
            .method(method)
            .path(path)
            .erased_handler(transformed_handler(transformer, handler))
            .build_with_default_accept(&self.config.dispatch.default_route_accept_type)?;
        self.add_action(action)
    }

    /// Registers a `GET` route rendering its model as JSON.
    ///
    /// ```
    /// use switchyard::prelude::*;
    ///
    /// # fn main() -> SwitchyardResult<()> {
    /// let app = Switchyard::new();
    /// app.get_json("/status", |_ctx: &mut RequestContext| Ok(vec!["up"]))?;
    ///
    /// let response = app.dispatch(Request::new(Method::GET, "/status")).into_response().unwrap();
    /// assert_eq!(response.body(), Some(r#"["up"]"#));
    /// assert_eq!(response.get_header("content-type"), Some("application/json"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_json<F, M>(&self, path: &str, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> Result<M, Interrupt> + Send + Sync + 'static,
        M: Serialize,
    {
        self.route_transformed(Method::GET, path, JsonTransformer::new(), handler)
    }

    /// Registers a before filter for every path.
    pub fn before<F>(&self, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        self.add_filter(Action::before(), None, handler)
    }

    /// Registers a before filter for `path`.
    pub fn before_path<F>(&self, path: &str, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        self.add_filter(Action::before(), Some(path), handler)
    }

    /// Registers an after filter for every path.
    pub fn after<F>(&self, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        self.add_filter(Action::after(), None, handler)
    }

    /// Registers an after filter for `path`.
    pub fn after_path<F>(&self, path: &str, handler: F) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        self.add_filter(Action::after(), Some(path), handler)
    }

    fn add_filter<F>(
        &self,
        builder: switchyard_core::FilterBuilder,
        path: Option<&str>,
        handler: F,
    ) -> SwitchyardResult<&Self>
    where
        F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
    {
        let builder = match path {
            Some(path) => builder.path(path),
            None => builder,
        };
        let action = builder
            .handler(handler)
            .build_with_default_accept(&self.config.dispatch.default_filter_accept_type)?;
        self.add_action(action)
    }

    /// Adds a prebuilt route or filter.
    pub fn add_action(&self, action: Action) -> SwitchyardResult<&Self> {
        self.dispatcher.routes().add(action);
        Ok(self)
    }

    /// Maps a handler to fault type `F` and its descendants.
    pub fn exception<F, H>(&self, handler: H) -> &Self
    where
        F: Fault,
        H: Fn(&HandlerFault, &mut RequestContext) + Send + Sync + 'static,
    {
        self.dispatcher.faults().map::<F, H>(handler);
        self
    }

    /// Marks the instance as serving.
    ///
    /// Route removal and clearing are refused until [`Switchyard::stop`].
    pub fn start(&self) -> SwitchyardResult<()> {
        let routes = self.dispatcher.routes();
        if routes.is_serving() {
            return Err(SwitchyardError::illegal_state("already serving"));
        }
        routes.set_serving(true);
        info!(routes = routes.len(), "switchyard started");
        Ok(())
    }

    /// Marks the instance as stopped.
    pub fn stop(&self) {
        if self.dispatcher.routes().is_serving() {
            self.dispatcher.routes().set_serving(false);
            info!("switchyard stopped");
        }
    }

    /// Returns true between [`Switchyard::start`] and [`Switchyard::stop`].
    #[must_use]
    pub fn is_serving(&self) -> bool {
        self.dispatcher.routes().is_serving()
    }

    /// Removes every route and filter.
    pub fn clear_routes(&self) -> SwitchyardResult<()> {
        self.dispatcher.routes().clear()
    }

    /// Removes routes registered with exactly `path`, optionally only for `method`.
    pub fn remove_route(&self, path: &str, method: Option<&Method>) -> SwitchyardResult<bool> {
        self.dispatcher.routes().remove(path, method)
    }

    /// Lists `(method, template, accept type)` for each registered route.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String, String)> {
        self.dispatcher.routes().describe()
    }

    /// Dispatches one request.
    pub fn dispatch(&self, request: Request) -> DispatchResult {
        self.dispatcher.dispatch(request)
    }

    /// Dispatches a prepared context.
    pub fn dispatch_context(&self, ctx: RequestContext) -> DispatchResult {
        self.dispatcher.dispatch_context(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use switchyard_core::Halt;

    fn body(app: &Switchyard, method: Method, path: &str) -> Option<String> {
        app.dispatch(Request::new(method, path))
            .into_response()
            .and_then(|mut r| r.take_body())
    }

    #[test]
    fn test_every_method_helper() {
        let app = Switchyard::new();
        app.get("/m", |_ctx: &mut RequestContext| Ok("get"))
            .unwrap()
            .post("/m", |_ctx: &mut RequestContext| Ok("post"))
            .unwrap()
            .put("/m", |_ctx: &mut RequestContext| Ok("put"))
            .unwrap()
            .patch("/m", |_ctx: &mut RequestContext| Ok("patch"))
            .unwrap()
            .delete("/m", |_ctx: &mut RequestContext| Ok("delete"))
            .unwrap()
            .options("/m", |_ctx: &mut RequestContext| Ok("options"))
            .unwrap()
            .trace("/m", |_ctx: &mut RequestContext| Ok("trace"))
            .unwrap()
            .connect("/m", |_ctx: &mut RequestContext| Ok("connect"))
            .unwrap()
            .head("/m", |_ctx: &mut RequestContext| Ok(""))
            .unwrap();

        for (method, expected) in [
            (Method::GET, "get"),
            (Method::POST, "post"),
            (Method::PUT, "put"),
            (Method::PATCH, "patch"),
            (Method::DELETE, "delete"),
            (Method::OPTIONS, "options"),
            (Method::TRACE, "trace"),
            (Method::CONNECT, "connect"),
        ] {
            assert_eq!(body(&app, method, "/m").as_deref(), Some(expected));
        }
        assert_eq!(app.routes().len(), 9);
    }

    #[test]
    fn test_empty_path_rejected() {
        let app = Switchyard::new();
        let err = app.get("", |_ctx: &mut RequestContext| Ok("x")).unwrap_err();
        assert!(matches!(err, SwitchyardError::InvalidAction { .. }));
    }

    #[test]
    fn test_route_with_accept() {
        let app = Switchyard::new();
        app.route_with_accept(Method::GET, "/doc", "application/json", |_ctx| Ok("{}"))
            .unwrap();

        let json = app
            .dispatch(Request::new(Method::GET, "/doc").with_accept("application/json"))
            .into_response()
            .unwrap();
        assert_eq!(json.body(), Some("{}"));

        let html = app
            .dispatch(Request::new(Method::GET, "/doc").with_accept("text/html"))
            .into_response()
            .unwrap();
        assert_eq!(html.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_configured_filter_accept() {
        let mut config = SwitchyardConfig::default();
        config.dispatch.default_filter_accept_type = "*/*".to_string();
        let app = Switchyard::with_config(config);

        app.before(|_ctx| Err(Halt::status(StatusCode::UNAUTHORIZED).into()))
            .unwrap();
        let response = app
            .dispatch(Request::new(Method::GET, "/x").with_accept("application/json"))
            .into_response()
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_start_twice_is_illegal() {
        let app = Switchyard::new();
        app.start().unwrap();
        assert!(app.is_serving());
        assert!(app.start().unwrap_err().is_illegal_state());
        assert!(app.clear_routes().unwrap_err().is_illegal_state());

        app.stop();
        assert!(!app.is_serving());
        app.clear_routes().unwrap();
    }

    #[test]
    fn test_remove_route() {
        let app = Switchyard::new();
        app.get("/gone", |_ctx: &mut RequestContext| Ok("here")).unwrap();
        assert!(app.remove_route("/gone", Some(&Method::GET)).unwrap());
        assert_eq!(
            app.dispatch(Request::new(Method::GET, "/gone"))
                .into_response()
                .unwrap()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_clones_share_routes() {
        let app = Switchyard::new();
        let clone = app.clone();
        clone.get("/shared", |_ctx: &mut RequestContext| Ok("yes")).unwrap();
        assert_eq!(body(&app, Method::GET, "/shared").as_deref(), Some("yes"));
    }
}
