//! The response shared by every handler of a request.

use http::StatusCode;

/// Mutable response built up across the before, route and after phases.
///
/// Headers form an ordered multi-map: [`Response::header`] appends, while
/// [`Response::set_header`] replaces every existing value of that name.
///
/// # Example
///
/// ```
/// use switchyard_core::Response;
/// use http::StatusCode;
///
/// let mut response = Response::new();
/// response.header("Set-Cookie", "a=1");
/// response.header("Set-Cookie", "b=2");
/// response.redirect("/login");
///
/// assert_eq!(response.status(), StatusCode::FOUND);
/// assert_eq!(response.header_values("set-cookie").count(), 2);
/// assert_eq!(response.get_header("Location"), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates an empty 200 response.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Appends a header value.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Replaces all values of a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove_header(&name);
        self.headers.push((name, value.into()));
    }

    /// Removes all values of a header. Returns true if any existed.
    pub fn remove_header(&mut self, name: &str) -> bool {
        let before = self.headers.len();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.len() != before
    }

    /// Returns the first value of a header (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over every value of a header, in insertion order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every header in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(&mut self, content_type: impl Into<String>) {
        self.set_header(http::header::CONTENT_TYPE.as_str(), content_type);
    }

    /// Returns the body, if any phase produced one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Sets the body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Takes the body, leaving none.
    pub fn take_body(&mut self) -> Option<String> {
        self.body.take()
    }

    /// Redirects with `302 Found`.
    pub fn redirect(&mut self, location: impl Into<String>) {
        self.redirect_with(location, StatusCode::FOUND);
    }

    /// Redirects with the given status.
    pub fn redirect_with(&mut self, location: impl Into<String>, status: StatusCode) {
        self.status = status;
        self.set_header(http::header::LOCATION.as_str(), location);
        self.set_header(http::header::CONNECTION.as_str(), "close");
    }

    /// Splits the response into status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, Vec<(String, String)>, Option<String>) {
        (self.status, self.headers, self.body)
    }
}
