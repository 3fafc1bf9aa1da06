//! Test response wrapper.

use crate::error::TestError;
use http::StatusCode;
use serde::de::DeserializeOwned;
use switchyard_core::Response;

/// A dispatched response with helpers for assertions.
///
/// Header lookups are case-insensitive and keep every value of repeated
/// headers in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
}

impl TestResponse {
    /// Wraps a dispatcher response. A missing body reads as empty.
    pub fn from_response(response: Response) -> Self {
        let (status, headers, body) = response.into_parts();
        Self {
            status,
            headers,
            body: body.unwrap_or_default(),
        }
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the status is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Returns true if the status is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Returns every header in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).next()
    }

    /// Returns every value of a header.
    pub fn header_values<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserializes the body as JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use http::StatusCode;
    /// use switchyard_test::TestResponse;
    ///
    /// let response = TestResponse::new(StatusCode::OK, Vec::new(), r#"{"id":"123"}"#);
    /// let value: serde_json::Value = response.json().unwrap();
    /// assert_eq!(value["id"], "123");
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Deserializes the body as a JSON Value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "expected status {expected}, got {} with body: {}",
            self.status, self.body
        );
        self
    }

    /// Asserts that the status code equals the expected u16 value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "expected status {expected}, got {}",
            self.status.as_u16()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let actual = self
            .header(name)
            .unwrap_or_else(|| panic!("header '{name}' not found in {:?}", self.headers));
        assert_eq!(actual, expected, "header '{name}' mismatch");
        self
    }

    /// Asserts that a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header exists.
    pub fn assert_no_header(&self, name: &str) -> &Self {
        assert!(self.header(name).is_none(), "header '{name}' should be absent");
        self
    }

    /// Asserts that the body equals the expected string.
    ///
    /// # Panics
    ///
    /// Panics if the body doesn't match.
    pub fn assert_body_eq(&self, expected: &str) -> &Self {
        assert_eq!(self.body, expected, "body mismatch");
        self
    }

    /// Asserts that the body contains the expected substring.
    ///
    /// # Panics
    ///
    /// Panics if the body doesn't contain the substring.
    pub fn assert_body_contains(&self, expected: &str) -> &Self {
        assert!(
            self.body.contains(expected),
            "body should contain '{expected}', got: {}",
            self.body
        );
        self
    }

    /// Asserts that a JSON field, addressed as `a.b.0.c`, equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or the field doesn't match.
    pub fn assert_json_field(&self, path: &str, expected: &serde_json::Value) -> &Self {
        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("body should be JSON: {e}"));
        let actual = json_path(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{path}' not found in: {json}"));
        assert_eq!(actual, expected, "JSON field '{path}' mismatch");
        self
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match segment.parse::<usize>() {
            Ok(index) => current.get(index),
            Err(_) => current.get(segment),
        })
}
