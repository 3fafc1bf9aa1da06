//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading or validating a [`SwitchyardConfig`](crate::SwitchyardConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Source is neither TOML nor JSON.
    #[error("unsupported configuration format '{format}' (expected toml or json)")]
    UnsupportedFormat {
        /// Extension or format name that was given.
        format: String,
    },

    /// Malformed TOML, or TOML naming an unknown section or key.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or JSON naming an unknown section or key.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but could not be loaded.
    #[error("cannot load .env file: {0}")]
    Dotenv(String),

    /// An environment override could not be applied.
    #[error("bad environment override {var}: {reason}")]
    EnvOverride {
        /// Variable name.
        var: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A loaded value fails validation.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `dispatch.default_route_accept_type`.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub(crate) fn env_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = ConfigError::invalid_value("dispatch.default_route_accept_type", "must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid value for dispatch.default_route_accept_type: must not be empty"
        );
    }

    #[test]
    fn test_env_override_display() {
        let err = ConfigError::env_override(
            "SWITCHYARD__DISPATCH__HAS_OTHER_HANDLERS",
            "expected boolean",
        );
        assert!(err.to_string().contains("HAS_OTHER_HANDLERS"));
    }

    #[test]
    fn test_read_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read("/etc/switchyard.toml", io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "cannot read /etc/switchyard.toml");
    }

    #[test]
    fn test_unsupported_format() {
        assert_eq!(
            ConfigError::unsupported_format("yaml").to_string(),
            "unsupported configuration format 'yaml' (expected toml or json)"
        );
    }
}
