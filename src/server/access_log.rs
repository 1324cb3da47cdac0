//! Access logging via a bounded, non-blocking queue.
//!
//! Request handlers hand records to a bounded `tokio::sync::mpsc::channel`
//! with `try_send` and move on; a background writer task turns them into
//! `tracing` events. A slow log sink therefore never shows up in request
//! latency.
//!
//! # Overflow policy
//!
//! When the queue is full the record is dropped, never awaited. Drops are
//! counted locally ([`AccessLog::dropped`]) and exported as
//! [`ACCESS_LOG_DROPPED_TOTAL`](crate::telemetry::ACCESS_LOG_DROPPED_TOTAL).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::telemetry::MetricsCollector;

/// Default number of records buffered between handlers and the writer.
pub const DEFAULT_ACCESS_LOG_CAPACITY: usize = 1024;

/// Tracing target for access records.
pub const ACCESS_TARGET: &str = "pack_service::access";

/// One access log entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessRecord {
    /// Emitted before the handler runs.
    Request {
        method: String,
        path: String,
        query: String,
        client_ip: Option<String>,
        /// Redacted JSON body, if one was captured.
        body: Option<Value>,
    },
    /// Emitted after the handler returns.
    Response {
        method: String,
        path: String,
        status: u16,
        duration_ms: f64,
    },
    /// A body was present but could not be captured or parsed.
    BodyUnparsed {
        method: String,
        path: String,
        reason: String,
    },
}

impl AccessRecord {
    fn emit(&self) {
        match self {
            AccessRecord::Request {
                method,
                path,
                query,
                client_ip,
                body,
            } => {
                let body = body.as_ref().map(Value::to_string).unwrap_or_default();
                let client_ip = client_ip.as_deref().unwrap_or("");
                debug!(target: ACCESS_TARGET, %method, %path, %query, client_ip, %body, "incoming request");
            }
            AccessRecord::Response {
                method,
                path,
                status,
                duration_ms,
            } => {
                let duration_ms = format!("{duration_ms:.2}");
                debug!(target: ACCESS_TARGET, %method, %path, status, %duration_ms, "request completed");
            }
            AccessRecord::BodyUnparsed {
                method,
                path,
                reason,
            } => {
                debug!(target: ACCESS_TARGET, %method, %path, %reason, "failed to parse request body");
            }
        }
    }
}

/// Sending half of the access log queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AccessLog {
    tx: mpsc::Sender<AccessRecord>,
    dropped: Arc<AtomicU64>,
    metrics: Arc<MetricsCollector>,
}

impl AccessLog {
    /// Create the queue without a writer; the caller drains the receiver.
    pub fn channel(
        capacity: usize,
        metrics: Arc<MetricsCollector>,
    ) -> (Self, mpsc::Receiver<AccessRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let log = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            metrics,
        };
        (log, rx)
    }

    /// Create the queue and spawn the writer task.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context.
    pub fn spawn(capacity: usize, metrics: Arc<MetricsCollector>) -> (Self, JoinHandle<()>) {
        let (log, rx) = Self::channel(capacity, metrics);
        let writer = tokio::spawn(write_records(rx));
        (log, writer)
    }

    /// Queue a record without waiting. Drops it if the queue is full.
    pub fn submit(&self, record: AccessRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                self.metrics.record_access_log_drop();
            }
        }
    }

    /// Records dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Drain the queue into `tracing` until every sender is gone.
pub async fn write_records(mut rx: mpsc::Receiver<AccessRecord>) {
    while let Some(record) = rx.recv().await {
        record.emit();
    }
}
