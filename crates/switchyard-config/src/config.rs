//! Top-level configuration.

use serde::{Deserialize, Serialize};
use switchyard_telemetry::LogConfig;

use crate::{ConfigError, DispatchConfig, LogFormat, LoggingConfig};

/// Complete Switchyard configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use switchyard_config::SwitchyardConfig;
///
/// let config = SwitchyardConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Dispatch behaviour.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SwitchyardConfig {
    /// Validates the configuration.
    ///
    /// Accept types must be non-empty and the log level must be a valid
    /// filter directive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.default_route_accept_type.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "dispatch.default_route_accept_type",
                "must not be empty",
            ));
        }

        if self.dispatch.default_filter_accept_type.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "dispatch.default_filter_accept_type",
                "must not be empty",
            ));
        }

        if self.logging.enabled {
            switchyard_telemetry::logging::create_env_filter(&self.logging.level).map_err(
                |e| ConfigError::invalid_value("logging.level", e.to_string()),
            )?;
        }

        Ok(())
    }

    /// Debug logging with pretty output and file/line info.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Info logging with JSON output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }

    /// Logging settings for `switchyard_telemetry::init_logging`.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from(&self.logging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(SwitchyardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_accept_rejected() {
        let mut config = SwitchyardConfig::default();
        config.dispatch.default_filter_accept_type = " ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_filter_accept_type"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = SwitchyardConfig::default();
        config.logging.level = "switchyard=notalevel".to_string();
        assert!(config.validate().is_err());

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = SwitchyardConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert!(!dev.log_config().json_format);

        let prod = SwitchyardConfig::production();
        assert_eq!(prod.logging.format, LogFormat::Json);
        assert!(prod.log_config().json_format);
    }

    #[test]
    fn test_serde_roundtrip_json() {
        let config = SwitchyardConfig::development();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SwitchyardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
