//! Logging and metrics for Switchyard.
//!
//! - **Logging**: `tracing-subscriber` initialisation with JSON or pretty
//!   output and an `EnvFilter` level directive.
//! - **Metrics**: dispatch counters and latency histograms through the
//!   `metrics` facade. Install any `metrics` recorder to export them.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchyard_telemetry::{init_telemetry, LogConfig};
//!
//! init_telemetry(&LogConfig::production())?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{describe_metrics, record_dispatch, record_fault, DispatchOutcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and registers metric descriptions.
pub fn init_telemetry(logging: &LogConfig) -> TelemetryResult<()> {
    init_logging(logging)?;
    describe_metrics();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_logging_disabled() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_telemetry(&config).is_ok());
    }
}
