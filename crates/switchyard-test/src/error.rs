//! Test error types.

use thiserror::Error;

/// Errors that can occur during testing.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// Header name or value is invalid
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Response body is not what was asked for
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No route, filter or error page produced a response
    #[error("request was not consumed")]
    NotConsumed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            TestError::InvalidHeader("bad name".to_string()).to_string(),
            "invalid header: bad name"
        );
        assert_eq!(TestError::NotConsumed.to_string(), "request was not consumed");
    }

    #[test]
    fn test_json_source() {
        let err: TestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
