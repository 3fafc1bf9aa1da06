//! Fixed error bodies.

use switchyard_config::DispatchConfig;

/// Placeholder replaced by the request path in not-found templates.
pub const PATH_PLACEHOLDER: &str = "{path}";

const NOT_FOUND_TEMPLATE: &str =
    "<html><body><h2>404 Not found</h2>The requested route [{path}] has not been mapped</body></html>";

const INTERNAL_ERROR: &str = "<html><body><h2>500 Internal Error</h2></body></html>";

/// Bodies served for unmapped routes and unhandled faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPages {
    not_found: String,
    internal_error: String,
}

impl Default for ErrorPages {
    fn default() -> Self {
        Self {
            not_found: NOT_FOUND_TEMPLATE.to_string(),
            internal_error: INTERNAL_ERROR.to_string(),
        }
    }
}

impl ErrorPages {
    /// Uses the overrides from `config`, falling back to the fixed bodies.
    #[must_use]
    pub fn from_config(config: &DispatchConfig) -> Self {
        let defaults = Self::default();
        Self {
            not_found: config.not_found_body.clone().unwrap_or(defaults.not_found),
            internal_error: config
                .internal_error_body
                .clone()
                .unwrap_or(defaults.internal_error),
        }
    }

    /// The 404 body for `path`.
    #[must_use]
    pub fn not_found(&self, path: &str) -> String {
        self.not_found.replace(PATH_PLACEHOLDER, path)
    }

    /// The 500 body.
    #[must_use]
    pub fn internal_error(&self) -> &str {
        &self.internal_error
    }
}
