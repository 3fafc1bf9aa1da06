//! Adapter between `http` types and the dispatcher.
//!
//! Any server built on the `http` crate can host a [`Switchyard`] by
//! collecting the request body and calling [`Switchyard::handle`]. A `None`
//! return means the request was not consumed and should be passed on.

use bytes::Bytes;
use http::header::ACCEPT;
use http::{HeaderName, HeaderValue};
use http_body_util::Full;
use switchyard_core::{Request, Response};
use tracing::warn;

use crate::Switchyard;

/// Response type produced by [`Switchyard::handle`].
pub type HttpResponse = http::Response<Full<Bytes>>;

impl Switchyard {
    /// Dispatches an `http` request.
    ///
    /// ```
    /// use bytes::Bytes;
    /// use switchyard::prelude::*;
    ///
    /// # fn main() -> SwitchyardResult<()> {
    /// let app = Switchyard::new();
    /// app.get("/ping", |_ctx: &mut RequestContext| Ok("pong"))?;
    ///
    /// let request = http::Request::get("/ping").body(Bytes::new()).unwrap();
    /// let response = app.handle(request).unwrap();
    /// assert_eq!(response.status(), 200);
    /// # Ok(())
    /// # }
    /// ```
    pub fn handle(&self, request: http::Request<Bytes>) -> Option<HttpResponse> {
        self.dispatch(from_http_request(request))
            .into_response()
            .map(into_http_response)
    }
}

/// Converts an `http` request, percent-decoding the path.
#[must_use]
pub fn from_http_request(request: http::Request<Bytes>) -> Request {
    let (parts, body) = request.into_parts();

    let raw_path = parts.uri.path();
    let path = urlencoding::decode(raw_path)
        .map_or_else(|_| raw_path.to_string(), std::borrow::Cow::into_owned);

    let mut converted = Request::new(parts.method, path);
    if let Some(query) = parts.uri.query() {
        converted = converted.with_query(query);
    }
    if let Some(accept) = parts.headers.get(ACCEPT).and_then(|v| v.to_str().ok()) {
        converted = converted.with_accept(accept);
    }
    converted.with_headers(parts.headers).with_body(body)
}

/// Converts a dispatcher response. Headers that are not valid HTTP are dropped.
#[must_use]
pub fn into_http_response(response: Response) -> HttpResponse {
    let (status, headers, body) = response.into_parts();

    let mut converted = http::Response::new(Full::new(Bytes::from(body.unwrap_or_default())));
    *converted.status_mut() = status;

    let header_map = converted.headers_mut();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                header_map.append(name, value);
            }
            _ => warn!(header = %name, "dropping invalid response header"),
        }
    }

    converted
}
