//! Telemetry metric names and label vocabularies.
//!
//! Metrics are recorded through a [`MetricsCollector`], which owns its own
//! Prometheus recorder instead of relying on a process-global one. Each
//! server (and each test) builds one collector and shares it by `Arc`.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `packs_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `transport`: `"http"` or `"grpc"`
//! - `operation`: HTTP route template (e.g. `"/packs/{id}"`) or gRPC method
//!   name (e.g. `"GetPackInfo"`)
//! - `status`: transport status class, see [`RequestStatus`]
//! - `kind`: business lookup kind, see [`OperationKind`]

mod collector;

use std::time::Duration;

pub use collector::MetricsCollector;

/// How often a long-running server should call
/// [`MetricsCollector::run_upkeep`].
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Total requests served, one per adapter call.
///
/// Labels: `transport`, `operation`, `status`.
pub const REQUESTS_TOTAL: &str = "packs_requests_total";

/// Request duration in seconds, measured around the business call.
///
/// Labels: `transport`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "packs_request_duration_seconds";

/// Total catalog lookups by kind, independent of transport.
///
/// Labels: `kind`.
pub const LOOKUPS_TOTAL: &str = "packs_lookups_total";

/// Number of packs currently available in the catalog.
pub const AVAILABLE_PACKS: &str = "packs_available_total";

/// Access log records dropped because the log queue was full.
pub const ACCESS_LOG_DROPPED_TOTAL: &str = "packs_access_log_dropped_total";

/// Histogram buckets for [`REQUEST_DURATION_SECONDS`].
pub const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Protocol surface a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Http,
    Grpc,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Http => "http",
            Transport::Grpc => "grpc",
        }
    }
}

/// Business-level lookup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    List,
    Info,
    Content,
    Exists,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::Info => "info",
            OperationKind::Content => "content",
            OperationKind::Exists => "exists",
        }
    }
}

/// Coarse HTTP status bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

impl HttpStatusClass {
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => HttpStatusClass::Success,
            300..=399 => HttpStatusClass::Redirect,
            400..=499 => HttpStatusClass::ClientError,
            500..=599 => HttpStatusClass::ServerError,
            _ => HttpStatusClass::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpStatusClass::Success => "2xx",
            HttpStatusClass::Redirect => "3xx",
            HttpStatusClass::ClientError => "4xx",
            HttpStatusClass::ServerError => "5xx",
            HttpStatusClass::Unknown => "unknown",
        }
    }
}

/// gRPC outcome vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcStatus {
    Ok,
    NotFound,
    InvalidArgument,
    Error,
}

impl RpcStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RpcStatus::Ok => "OK",
            RpcStatus::NotFound => "NOT_FOUND",
            RpcStatus::InvalidArgument => "INVALID_ARGUMENT",
            RpcStatus::Error => "ERROR",
        }
    }
}

/// Outcome label for [`REQUESTS_TOTAL`], in the vocabulary of the transport
/// that served the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Http(HttpStatusClass),
    Rpc(RpcStatus),
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Http(class) => class.as_str(),
            RequestStatus::Rpc(status) => status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_classes() {
        assert_eq!(HttpStatusClass::from_code(200).as_str(), "2xx");
        assert_eq!(HttpStatusClass::from_code(301).as_str(), "3xx");
        assert_eq!(HttpStatusClass::from_code(404).as_str(), "4xx");
        assert_eq!(HttpStatusClass::from_code(503).as_str(), "5xx");
        assert_eq!(HttpStatusClass::from_code(101).as_str(), "unknown");
        assert_eq!(HttpStatusClass::from_code(999).as_str(), "unknown");
    }

    #[test]
    fn rpc_status_names() {
        assert_eq!(RequestStatus::Rpc(RpcStatus::NotFound).as_str(), "NOT_FOUND");
        assert_eq!(RequestStatus::Rpc(RpcStatus::Error).as_str(), "ERROR");
    }
}
