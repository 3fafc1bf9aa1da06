//! Response transformers.
//!
//! A transformer renders the model returned by a route handler into the
//! response body, so handlers can return domain values instead of strings.

use std::sync::Arc;

use serde::Serialize;

use crate::{Fault, Interrupt, RequestContext, RouteHandler};

/// Raised when a model cannot be rendered.
#[derive(Debug, thiserror::Error)]
#[error("failed to render response: {message}")]
pub struct RenderFault {
    message: String,
}

impl RenderFault {
    /// Creates a render fault.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Fault for RenderFault {}

/// Renders handler models into body strings.
pub trait ResponseTransformer: Send + Sync + 'static {
    /// Content type set on responses rendered by this transformer.
    fn content_type(&self) -> Option<&str> {
        None
    }

    /// Renders the model.
    fn render<M: Serialize>(&self, model: &M) -> Result<String, RenderFault>;
}

/// Renders models as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer {
    pretty: bool,
}

impl JsonTransformer {
    /// Compact JSON output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed JSON output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ResponseTransformer for JsonTransformer {
    fn content_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn render<M: Serialize>(&self, model: &M) -> Result<String, RenderFault> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        };
        rendered.map_err(|e| RenderFault::new(e.to_string()))
    }
}

/// Wraps a model-returning handler so its result is rendered by `transformer`.
///
/// ```
/// use switchyard_core::{transformed_handler, JsonTransformer, Request, RequestContext};
/// use http::Method;
///
/// let handler = transformed_handler(JsonTransformer::new(), |_ctx: &mut RequestContext| {
///     Ok(serde_json::json!({"title": "Hamlet"}))
/// });
///
/// let mut ctx = RequestContext::new(Request::new(Method::GET, "/"));
/// let body = handler(&mut ctx).unwrap();
/// assert_eq!(body.as_deref(), Some(r#"{"title":"Hamlet"}"#));
/// assert_eq!(ctx.response.get_header("content-type"), Some("application/json"));
/// ```
pub fn transformed_handler<T, F, M>(transformer: T, handler: F) -> RouteHandler
where
    T: ResponseTransformer,
    F: Fn(&mut RequestContext) -> Result<M, Interrupt> + Send + Sync + 'static,
    M: Serialize,
{
    Arc::new(move |ctx: &mut RequestContext| {
        let model = handler(ctx)?;
        let body = transformer.render(&model)?;
        if let Some(content_type) = transformer.content_type() {
            ctx.response.content_type(content_type);
        }
        Ok(Some(body))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Halt, Request};
    use http::Method;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Book {
        title: &'static str,
        author: &'static str,
    }

    struct Failing;

    impl Serialize for Failing {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not serializable"))
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Request::new(Method::GET, "/books/101"))
    }

    #[test]
    fn test_json_render() {
        let json = JsonTransformer::new()
            .render(&Book {
                title: "Hamlet",
                author: "William_Shakespeare",
            })
            .unwrap();
        assert_eq!(json, r#"{"title":"Hamlet","author":"William_Shakespeare"}"#);
    }

    #[test]
    fn test_pretty_render() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        let json = JsonTransformer::pretty().render(&map).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_render_failure_is_fault() {
        let handler = transformed_handler(JsonTransformer::new(), |_ctx: &mut RequestContext| {
            Ok(Failing)
        });

        match handler(&mut ctx()) {
            Err(Interrupt::Fault(fault)) => assert!(fault.is::<RenderFault>()),
            other => panic!("expected render fault, got {other:?}"),
        }
    }

    #[test]
    fn test_halt_passes_through() {
        let handler = transformed_handler(JsonTransformer::new(), |_ctx: &mut RequestContext| {
            Err::<Book, _>(Halt::status(http::StatusCode::FORBIDDEN).into())
        });

        let mut ctx = ctx();
        assert!(matches!(handler(&mut ctx), Err(Interrupt::Halt(_))));
        assert_eq!(ctx.response.get_header("content-type"), None);
    }
}
