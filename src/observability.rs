//! Observability hooks for schedule operations.
//!
//! Implement [`ScheduleMetrics`] to feed store timings and failures into a
//! monitoring system:
//!
//! ```ignore
//! use schedule_kit::observability::ScheduleMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl ScheduleMetrics for PrometheusMetrics {
//!     fn record_write(&self, operation: &str, duration: Duration) {
//!         // histogram!("schedule_write_seconds", "op" => operation).record(duration);
//!     }
//! }
//!
//! // let service = ScheduleService::new(repo).with_metrics(Arc::new(PrometheusMetrics));
//! ```
//!
//! The service defaults to [`NoOpMetrics`]. [`LogMetrics`] keeps the trait's
//! default bodies, which log through the `log` crate.

use std::time::Duration;

/// Trait for schedule metrics collection.
pub trait ScheduleMetrics: Send + Sync {
    /// Record a full document read.
    fn record_read(&self, operation: &str, duration: Duration) {
        debug!("Schedule READ for {} took {:?}", operation, duration);
    }

    /// Record a full document rewrite.
    fn record_write(&self, operation: &str, duration: Duration) {
        debug!("Schedule WRITE for {} took {:?}", operation, duration);
    }

    /// Record a lookup of an id that does not exist.
    fn record_not_found(&self, operation: &str, id: &str) {
        debug!("Schedule {} MISS: {}", operation, id);
    }

    /// Record a failed operation.
    fn record_error(&self, operation: &str, error: &str) {
        warn!("Schedule ERROR in {}: {}", operation, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl ScheduleMetrics for NoOpMetrics {
    fn record_read(&self, _operation: &str, _duration: Duration) {}
    fn record_write(&self, _operation: &str, _duration: Duration) {}
    fn record_not_found(&self, _operation: &str, _id: &str) {}
    fn record_error(&self, _operation: &str, _error: &str) {}
}

/// Metrics that only log.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl ScheduleMetrics for LogMetrics {}
