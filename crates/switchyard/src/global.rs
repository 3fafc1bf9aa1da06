//! Process-wide instance.
//!
//! A convenience for applications that want a single router without passing
//! a [`Switchyard`] around. The instance must be created with [`init`] before
//! any other function is used and is dropped by [`stop`].
//!
//! ```
//! use switchyard::global;
//! use switchyard::prelude::*;
//!
//! # fn main() -> SwitchyardResult<()> {
//! global::init()?;
//! global::get("/hello", |_ctx: &mut RequestContext| Ok("Hello World!"))?;
//!
//! let response = global::dispatch(Request::new(Method::GET, "/hello"))?
//!     .into_response()
//!     .unwrap();
//! assert_eq!(response.body(), Some("Hello World!"));
//!
//! global::stop();
//! # Ok(())
//! # }
//! ```

use http::Method;
use parking_lot::{const_rwlock, RwLock};
use switchyard_config::SwitchyardConfig;
use switchyard_core::{
    Fault, FilterResult, HandlerFault, Interrupt, IntoBody, Request, RequestContext,
    SwitchyardError, SwitchyardResult,
};
use switchyard_pipeline::DispatchResult;

use crate::Switchyard;

static INSTANCE: RwLock<Option<Switchyard>> = const_rwlock(None);

/// Creates the process-wide instance with the default configuration.
pub fn init() -> SwitchyardResult<Switchyard> {
    init_with_config(SwitchyardConfig::default())
}

/// Creates the process-wide instance.
///
/// Fails if an instance already exists.
pub fn init_with_config(config: SwitchyardConfig) -> SwitchyardResult<Switchyard> {
    let mut slot = INSTANCE.write();
    if slot.is_some() {
        return Err(SwitchyardError::illegal_state(
            "process-wide instance already initialised",
        ));
    }
    let app = Switchyard::with_config(config);
    *slot = Some(app.clone());
    Ok(app)
}

/// Returns a handle to the process-wide instance.
pub fn instance() -> SwitchyardResult<Switchyard> {
    INSTANCE.read().clone().ok_or_else(|| {
        SwitchyardError::illegal_state("process-wide instance used before init")
    })
}

/// Returns true if [`init`] has been called and [`stop`] has not.
#[must_use]
pub fn is_initialized() -> bool {
    INSTANCE.read().is_some()
}

/// Stops and drops the process-wide instance. Does nothing if none exists.
pub fn stop() {
    if let Some(app) = INSTANCE.write().take() {
        app.stop();
    }
}

/// Registers a `GET` route on the process-wide instance.
pub fn get<F, B>(path: &str, handler: F) -> SwitchyardResult<()>
where
    F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
    B: IntoBody,
{
    route(Method::GET, path, handler)
}

/// Registers a `POST` route on the process-wide instance.
pub fn post<F, B>(path: &str, handler: F) -> SwitchyardResult<()>
where
    F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
    B: IntoBody,
{
    route(Method::POST, path, handler)
}

/// Registers a route on the process-wide instance.
pub fn route<F, B>(method: Method, path: &str, handler: F) -> SwitchyardResult<()>
where
    F: Fn(&mut RequestContext) -> Result<B, Interrupt> + Send + Sync + 'static,
    B: IntoBody,
{
    instance()?.route(method, path, handler).map(|_| ())
}

/// Registers a before filter for every path on the process-wide instance.
pub fn before<F>(handler: F) -> SwitchyardResult<()>
where
    F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
{
    instance()?.before(handler).map(|_| ())
}

/// Registers an after filter for every path on the process-wide instance.
pub fn after<F>(handler: F) -> SwitchyardResult<()>
where
    F: Fn(&mut RequestContext) -> FilterResult + Send + Sync + 'static,
{
    instance()?.after(handler).map(|_| ())
}

/// Maps a fault handler on the process-wide instance.
pub fn exception<F, H>(handler: H) -> SwitchyardResult<()>
where
    F: Fault,
    H: Fn(&HandlerFault, &mut RequestContext) + Send + Sync + 'static,
{
    instance()?.exception::<F, H>(handler);
    Ok(())
}

/// Dispatches a request through the process-wide instance.
pub fn dispatch(request: Request) -> SwitchyardResult<DispatchResult> {
    Ok(instance()?.dispatch(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the shared slot; splitting it would race.
    #[test]
    fn test_global_lifecycle() {
        stop();
        assert!(!is_initialized());
        assert!(instance().unwrap_err().is_illegal_state());
        assert!(get("/a", |_ctx: &mut RequestContext| Ok("a"))
            .unwrap_err()
            .is_illegal_state());

        init().unwrap();
        assert!(init().unwrap_err().is_illegal_state());

        get("/a", |_ctx: &mut RequestContext| Ok("a")).unwrap();
        post("/a", |_ctx: &mut RequestContext| Ok("posted")).unwrap();
        after(|ctx| {
            ctx.response.header("X-Global", "1");
            Ok(())
        })
        .unwrap();

        let response = dispatch(Request::new(Method::POST, "/a"))
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.body(), Some("posted"));
        assert_eq!(response.get_header("x-global"), Some("1"));

        instance().unwrap().start().unwrap();
        stop();
        assert!(!is_initialized());

        // A fresh instance starts empty.
        init().unwrap();
        let response = dispatch(Request::new(Method::GET, "/a"))
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        stop();
    }
}
