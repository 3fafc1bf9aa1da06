//! Dispatcher integration tests.

use std::sync::Arc;

use http::{Method, StatusCode};
use switchyard_config::DispatchConfig;
use switchyard_core::{Action, Fault, FaultClass, Interrupt, Request, RequestContext};
use switchyard_pipeline::{Dispatcher, FaultRegistry, Routes};

#[derive(Debug, thiserror::Error)]
#[error("storage failure")]
struct StorageFault;
impl Fault for StorageFault {}

#[derive(Debug, thiserror::Error)]
#[error("row {0} missing")]
struct RowMissing(u32);
impl Fault for RowMissing {
    fn parent() -> Option<FaultClass> {
        Some(FaultClass::of::<StorageFault>())
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(
        Arc::new(Routes::new()),
        Arc::new(FaultRegistry::new()),
        &DispatchConfig::default(),
    )
}

fn add_route<F>(dispatcher: &Dispatcher, method: Method, path: &str, handler: F)
where
    F: Fn(&mut RequestContext) -> Result<String, Interrupt> + Send + Sync + 'static,
{
    dispatcher.routes().add(
        Action::route()
            .method(method)
            .path(path)
            .handler(handler)
            .build()
            .unwrap(),
    );
}

#[test]
fn route_fault_resolves_to_ancestor_handler() {
    let dispatcher = dispatcher();
    dispatcher.faults().map::<StorageFault, _>(|fault, ctx| {
        ctx.response.set_status(StatusCode::SERVICE_UNAVAILABLE);
        ctx.response.set_body(format!("storage: {fault}"));
    });
    add_route(&dispatcher, Method::GET, "/rows/:id", |ctx| {
        let id = ctx.param("id").and_then(|id| id.parse().ok()).unwrap_or(0);
        Err(RowMissing(id).into())
    });

    let response = dispatcher
        .dispatch(Request::new(Method::GET, "/rows/7"))
        .into_response()
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body(), Some("storage: row 7 missing"));
}

#[test]
fn filters_see_their_own_captures() {
    let dispatcher = dispatcher();
    dispatcher.routes().add(
        Action::before()
            .path("/files/*")
            .accept_type("*/*")
            .handler(|ctx| {
                let joined = ctx.splat().join(",");
                ctx.response.header("X-Splat", joined);
                Ok(())
            })
            .build()
            .unwrap(),
    );
    add_route(&dispatcher, Method::GET, "/files/:dir/*", |ctx| {
        Ok(format!(
            "{}|{}",
            ctx.param(":DIR").unwrap_or_default(),
            ctx.splat().join(",")
        ))
    });

    let response = dispatcher
        .dispatch(Request::new(Method::GET, "/files/docs/a/b.txt"))
        .into_response()
        .unwrap();
    assert_eq!(response.get_header("x-splat"), Some("docs/a/b.txt"));
    assert_eq!(response.body(), Some("docs|a/b.txt"));
}

#[test]
fn most_specific_route_wins_regardless_of_order() {
    let dispatcher = dispatcher();
    add_route(&dispatcher, Method::GET, "/users/*", |_| Ok("splat".to_string()));
    add_route(&dispatcher, Method::GET, "/users/:id", |_| Ok("param".to_string()));
    add_route(&dispatcher, Method::GET, "/users/me", |_| Ok("literal".to_string()));

    let body = |path: &str| {
        dispatcher
            .dispatch(Request::new(Method::GET, path))
            .into_response()
            .and_then(|mut r| r.take_body())
    };
    assert_eq!(body("/users/me").as_deref(), Some("literal"));
    assert_eq!(body("/users/42").as_deref(), Some("param"));
    assert_eq!(body("/users/42/posts").as_deref(), Some("splat"));
}

#[test]
fn clear_refused_while_serving() {
    let dispatcher = dispatcher();
    add_route(&dispatcher, Method::GET, "/a", |_| Ok("a".to_string()));

    dispatcher.routes().set_serving(true);
    assert!(dispatcher.routes().clear().unwrap_err().is_illegal_state());

    dispatcher.routes().set_serving(false);
    dispatcher.routes().clear().unwrap();
    let response = dispatcher
        .dispatch(Request::new(Method::GET, "/a"))
        .into_response()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn concurrent_dispatch() {
    let dispatcher = dispatcher();
    add_route(&dispatcher, Method::GET, "/echo/:value", |ctx| {
        Ok(ctx.param("value").unwrap_or_default().to_string())
    });

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            std::thread::spawn(move || {
                let path = format!("/echo/{i}");
                let response = dispatcher
                    .dispatch(Request::new(Method::GET, path))
                    .into_response()
                    .unwrap();
                response.body().map(str::to_string)
            })
        })
        .collect();

    for (i, thread) in threads.into_iter().enumerate() {
        assert_eq!(thread.join().unwrap(), Some(i.to_string()));
    }
}
