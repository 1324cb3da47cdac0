//! Metrics collector backed by a private Prometheus recorder.

use std::fmt;
use std::time::Duration;

use metrics_exporter_prometheus::{
    Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

use super::{
    ACCESS_LOG_DROPPED_TOTAL, AVAILABLE_PACKS, DURATION_BUCKETS, LOOKUPS_TOTAL, OperationKind,
    REQUEST_DURATION_SECONDS, REQUESTS_TOTAL, RequestStatus, Transport,
};
use crate::{PackError, Result};

/// Process-wide request metrics for both transports.
///
/// Every recording call is infallible and lock-free from the caller's
/// perspective; the underlying atomics tolerate any number of concurrent
/// writers. [`export`](Self::export) only reads, so scraping never shows up
/// in the counters it renders.
pub struct MetricsCollector {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsCollector {
    /// Create a collector with its own, isolated recorder.
    pub fn new() -> Result<Self> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                DURATION_BUCKETS,
            )
            .map_err(|e| PackError::Metrics(e.to_string()))?
            .build_recorder();
        let handle = recorder.handle();
        Ok(Self { recorder, handle })
    }

    /// Record one served request: a counter increment keyed by
    /// (transport, operation, status) and a latency sample keyed by
    /// (transport, operation).
    pub fn record_request(
        &self,
        transport: Transport,
        operation: &'static str,
        status: RequestStatus,
        duration: Duration,
    ) {
        let elapsed = duration.as_secs_f64();
        metrics::with_local_recorder(&self.recorder, || {
            metrics::counter!(REQUESTS_TOTAL,
                "transport" => transport.as_str(),
                "operation" => operation,
                "status" => status.as_str(),
            )
            .increment(1);
            metrics::histogram!(REQUEST_DURATION_SECONDS,
                "transport" => transport.as_str(),
                "operation" => operation,
            )
            .record(elapsed);
        });
    }

    /// Count a business-level lookup.
    pub fn record_operation_kind(&self, kind: OperationKind) {
        metrics::with_local_recorder(&self.recorder, || {
            metrics::counter!(LOOKUPS_TOTAL, "kind" => kind.as_str()).increment(1);
        });
    }

    /// Set the available-packs gauge.
    pub fn set_available_count(&self, count: usize) {
        metrics::with_local_recorder(&self.recorder, || {
            metrics::gauge!(AVAILABLE_PACKS).set(count as f64);
        });
    }

    /// Count an access log record lost to a full queue.
    pub fn record_access_log_drop(&self) {
        metrics::with_local_recorder(&self.recorder, || {
            metrics::counter!(ACCESS_LOG_DROPPED_TOTAL).increment(1);
        });
    }

    /// Render the current state in Prometheus text exposition format.
    pub fn export(&self) -> String {
        self.handle.render()
    }

    /// Fold buffered histogram samples into their buckets.
    ///
    /// [`export`](Self::export) does this too, but samples keep accumulating
    /// between scrapes, so long-running processes must call this periodically.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsCollector").finish_non_exhaustive()
    }
}
