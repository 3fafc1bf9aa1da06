//! Configuration schema types.

use serde::{Deserialize, Serialize};
use switchyard_telemetry::LogConfig;

/// Dispatch configuration section.
///
/// # Example
///
/// ```
/// use switchyard_config::DispatchConfig;
///
/// let config = DispatchConfig::default();
/// assert_eq!(config.default_route_accept_type, "*/*");
/// assert_eq!(config.default_filter_accept_type, "text/html");
/// assert!(!config.has_other_handlers);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Accept type for routes registered without one.
    #[serde(default = "default_route_accept_type")]
    pub default_route_accept_type: String,

    /// Accept type for filters registered without one.
    #[serde(default = "default_filter_accept_type")]
    pub default_filter_accept_type: String,

    /// Return "not consumed" instead of a 404 page when nothing produced a body.
    #[serde(default)]
    pub has_other_handlers: bool,

    /// Replacement for the 404 page. `{path}` is replaced by the request path.
    #[serde(default)]
    pub not_found_body: Option<String>,

    /// Replacement for the 500 page.
    #[serde(default)]
    pub internal_error_body: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_route_accept_type: default_route_accept_type(),
            default_filter_accept_type: default_filter_accept_type(),
            has_other_handlers: false,
            not_found_body: None,
            internal_error_body: None,
        }
    }
}

fn default_route_accept_type() -> String {
    "*/*".to_string()
}

fn default_filter_accept_type() -> String {
    "text/html".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging initialisation.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. "info", "switchyard_pipeline=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log records.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            span_events: config.format == LogFormat::Pretty,
            file_line_info: config.include_location,
            include_target: true,
        }
    }
}
