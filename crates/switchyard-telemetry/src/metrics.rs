//! Dispatch metrics.
//!
//! Metrics are recorded through the `metrics` facade. No exporter is
//! installed here; without a recorder every call is a no-op.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `switchyard_dispatch_total` | Counter | `outcome`, `status` | Dispatched requests |
//! | `switchyard_dispatch_duration_seconds` | Histogram | `outcome` | Dispatch latency |
//! | `switchyard_faults_total` | Counter | `class`, `handled` | Faults raised by handlers |

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Counter of dispatched requests.
pub const DISPATCH_TOTAL: &str = "switchyard_dispatch_total";

/// Histogram of dispatch latency.
pub const DISPATCH_DURATION: &str = "switchyard_dispatch_duration_seconds";

/// Counter of handler faults.
pub const FAULTS_TOTAL: &str = "switchyard_faults_total";

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// A handler produced the body.
    Consumed,
    /// A filter or route halted.
    Halted,
    /// A fault was raised (handled or not).
    Faulted,
    /// No route matched and the 404 page was served.
    NotFound,
    /// No body was produced and another handler may take the request.
    NotConsumed,
}

impl DispatchOutcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Consumed => "consumed",
            Self::Halted => "halted",
            Self::Faulted => "faulted",
            Self::NotFound => "not_found",
            Self::NotConsumed => "not_consumed",
        }
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registers descriptions for the metrics above with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of dispatched requests");
    describe_histogram!(
        DISPATCH_DURATION,
        metrics::Unit::Seconds,
        "Time spent dispatching a request"
    );
    describe_counter!(FAULTS_TOTAL, "Total number of faults raised by handlers");
}

/// Records a finished dispatch.
///
/// `status` is `None` for [`DispatchOutcome::NotConsumed`].
pub fn record_dispatch(outcome: DispatchOutcome, status: Option<u16>, duration: Duration) {
    let status = status.map_or_else(|| "none".to_string(), |s| s.to_string());
    counter!(
        DISPATCH_TOTAL,
        "outcome" => outcome.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(DISPATCH_DURATION, "outcome" => outcome.as_str()).record(duration.as_secs_f64());
}

/// Records a fault raised by a handler.
pub fn record_fault(class: &str, handled: bool) {
    counter!(
        FAULTS_TOTAL,
        "class" => class.to_string(),
        "handled" => handled.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(DispatchOutcome::Consumed.as_str(), "consumed");
        assert_eq!(DispatchOutcome::NotConsumed.to_string(), "not_consumed");
        assert_eq!(DispatchOutcome::NotFound.as_str(), "not_found");
    }

    #[test]
    fn test_record_without_recorder() {
        describe_metrics();
        record_dispatch(DispatchOutcome::Consumed, Some(200), Duration::from_millis(3));
        record_dispatch(DispatchOutcome::NotConsumed, None, Duration::ZERO);
        record_fault("BookNotFound", true);
    }
}
