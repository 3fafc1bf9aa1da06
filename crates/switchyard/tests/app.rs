//! End-to-end behaviour of a configured application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use switchyard::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("book {0} not found")]
struct BookNotFound(String);
impl Fault for BookNotFound {}

struct Book {
    author: &'static str,
    title: &'static str,
}

fn books_app() -> Switchyard {
    let mut books = HashMap::new();
    books.insert(
        "101".to_string(),
        Book {
            author: "William_Shakespeare",
            title: "Hamlet",
        },
    );
    let books = Arc::new(books);

    let app = Switchyard::new();
    app.get("/books/:id", move |ctx: &mut RequestContext| {
        let id = ctx.param(":id").unwrap_or_default().to_string();
        match books.get(&id) {
            Some(book) => Ok(format!("Title: {}, Author: {}", book.title, book.author)),
            None => Err(BookNotFound(id).into()),
        }
    })
    .unwrap();
    app.exception::<BookNotFound, _>(|_fault, ctx| {
        ctx.response.set_status(StatusCode::NOT_FOUND);
        ctx.response.set_body("Book not found");
    });
    app
}

fn send(app: &Switchyard, method: Method, path: &str) -> Response {
    app.dispatch(Request::new(method, path))
        .into_response()
        .expect("request should be consumed")
}

#[test]
fn books_lookup() {
    let app = books_app();

    let found = send(&app, Method::GET, "/books/101");
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(found.body(), Some("Title: Hamlet, Author: William_Shakespeare"));

    let missing = send(&app, Method::GET, "/books/9999");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.body(), Some("Book not found"));
}

#[test]
fn halt_from_before_filter_wins() {
    let app = Switchyard::new();
    app.before(|ctx: &mut RequestContext| {
        if ctx.request.query_param("user").as_deref() != Some("admin") {
            return Err(Halt::with_body(StatusCode::UNAUTHORIZED, "Go Away!").into());
        }
        Ok(())
    })
    .unwrap();
    let served = Arc::new(AtomicBool::new(false));
    let route_served = Arc::clone(&served);
    app.get("/secretcontent", move |_ctx: &mut RequestContext| {
        route_served.store(true, Ordering::SeqCst);
        Ok("secret")
    })
    .unwrap();
    let after_ran = Arc::new(AtomicBool::new(false));
    let after_flag = Arc::clone(&after_ran);
    app.after(move |_ctx: &mut RequestContext| {
        after_flag.store(true, Ordering::SeqCst);
        Ok(())
    })
    .unwrap();

    let denied = send(&app, Method::GET, "/secretcontent");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(denied.body(), Some("Go Away!"));
    assert!(!served.load(Ordering::SeqCst));
    assert!(!after_ran.load(Ordering::SeqCst));

    let allowed = app
        .dispatch(Request::from_target(Method::GET, "/secretcontent?user=admin"))
        .into_response()
        .unwrap();
    assert_eq!(allowed.body(), Some("secret"));
    assert!(served.load(Ordering::SeqCst));
    assert!(after_ran.load(Ordering::SeqCst));
}

#[test]
fn head_served_by_get_route() {
    let app = Switchyard::new();
    app.get("/x", |_ctx: &mut RequestContext| Ok("content")).unwrap();

    let head = send(&app, Method::HEAD, "/x");
    assert_eq!(head.status(), StatusCode::OK);
    assert_eq!(head.body(), Some(""));

    assert_eq!(send(&app, Method::HEAD, "/y").status(), StatusCode::NOT_FOUND);
}

#[test]
fn param_and_splat_extraction() {
    let app = Switchyard::new();
    app.get("/paramandwild/:param/stuff/*", |ctx: &mut RequestContext| {
        Ok(format!(
            "paramandwild: {}{}",
            ctx.param(":param").unwrap_or_default(),
            ctx.splat().first().map(String::as_str).unwrap_or_default()
        ))
    })
    .unwrap();

    let response = send(&app, Method::GET, "/paramandwild/thedude/stuff/andits");
    assert_eq!(response.body(), Some("paramandwild: thedudeandits"));
}

#[test]
fn literal_segments_are_case_sensitive() {
    let app = Switchyard::new();
    app.get("/tworoutes/param/:param", |ctx: &mut RequestContext| {
        Ok(format!("lower: {}", ctx.param("param").unwrap_or_default()))
    })
    .unwrap();
    app.get("/tworoutes/PARAM/:param", |ctx: &mut RequestContext| {
        Ok(format!("upper: {}", ctx.param("PARAM").unwrap_or_default()))
    })
    .unwrap();

    assert_eq!(
        send(&app, Method::GET, "/tworoutes/param/Value").body(),
        Some("lower: Value")
    );
    assert_eq!(
        send(&app, Method::GET, "/tworoutes/PARAM/Value").body(),
        Some("upper: Value")
    );
}

#[test]
fn filters_run_in_registration_order() {
    let app = Switchyard::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second"] {
        let order = Arc::clone(&order);
        app.before(move |_ctx: &mut RequestContext| {
            order.lock().unwrap().push(format!("before-{name}"));
            Ok(())
        })
        .unwrap();
    }
    let route_order = Arc::clone(&order);
    app.get("/ordered", move |_ctx: &mut RequestContext| {
        route_order.lock().unwrap().push("route".to_string());
        Ok("done")
    })
    .unwrap();
    let after_order = Arc::clone(&order);
    app.after_path("/ordered", move |_ctx: &mut RequestContext| {
        after_order.lock().unwrap().push("after".to_string());
        Ok(())
    })
    .unwrap();

    send(&app, Method::GET, "/ordered");
    assert_eq!(
        *order.lock().unwrap(),
        vec!["before-first", "before-second", "route", "after"]
    );
}

#[test]
fn unmapped_route_page() {
    let app = Switchyard::new();
    let response = send(&app, Method::GET, "/no/such/thing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.body(),
        Some("<html><body><h2>404 Not found</h2>The requested route [/no/such/thing] has not been mapped</body></html>")
    );
}

#[test]
fn not_consumed_when_other_handlers_exist() {
    let config = ConfigLoader::new()
        .with_string("[dispatch]\nhas_other_handlers = true", "toml")
        .unwrap()
        .load()
        .unwrap();
    let app = Switchyard::with_config(config);
    app.get("/silent", |_ctx: &mut RequestContext| Ok(())).unwrap();

    assert!(!app.dispatch(Request::new(Method::GET, "/silent")).is_consumed());
    assert!(!app.dispatch(Request::new(Method::GET, "/missing")).is_consumed());
}

#[test]
fn json_route_and_body_decoding() {
    #[derive(serde::Deserialize, serde::Serialize)]
    struct Echo {
        name: String,
    }

    let app = Switchyard::new();
    app.route_transformed(
        Method::POST,
        "/echo",
        JsonTransformer::new(),
        |ctx: &mut RequestContext| -> Result<Echo, Interrupt> {
            let echo: Echo = ctx.request.body_json()?;
            Ok(echo)
        },
    )
    .unwrap();

    let response = app
        .dispatch(Request::new(Method::POST, "/echo").with_body(r#"{"name":"dude"}"#))
        .into_response()
        .unwrap();
    assert_eq!(response.get_header("content-type"), Some("application/json"));
    let echoed: serde_json::Value = serde_json::from_str(response.body().unwrap()).unwrap();
    assert_eq!(echoed["name"], "dude");

    let malformed = app
        .dispatch(Request::new(Method::POST, "/echo").with_body("not json"))
        .into_response()
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn redirect_from_route() {
    let app = Switchyard::new();
    app.get("/old", |ctx: &mut RequestContext| {
        ctx.response.redirect("/new");
        Ok("")
    })
    .unwrap();

    let response = send(&app, Method::GET, "/old");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.get_header("location"), Some("/new"));
    assert_eq!(response.get_header("connection"), Some("close"));
}
