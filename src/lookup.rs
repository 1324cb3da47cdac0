//! Transport-independent catalog lookups.
//!
//! Both the HTTP router and the gRPC servicer go through [`PackLookup`]. It
//! owns the decisions that must not drift between transports: which ids are
//! well-formed, what counts as "not found", and when a request is recorded in
//! metrics. Each adapter only translates the resulting [`Lookup`] into its own
//! wire status.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::catalog::CatalogStore;
use crate::telemetry::{
    HttpStatusClass, MetricsCollector, OperationKind, RequestStatus, RpcStatus, Transport,
};
use crate::types::{Pack, PackList, PackSummary};
use crate::{PackError, Result};

/// Longest accepted pack identifier, in bytes.
pub const MAX_PACK_ID_LEN: usize = 128;

/// Result of a catalog lookup, before any transport encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    /// The request was malformed (e.g. an unusable identifier).
    Invalid(String),
    /// Unexpected fault while serving the request.
    Internal(String),
}

/// Variant of a [`Lookup`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Found,
    NotFound,
    Invalid,
    Internal,
}

impl Outcome {
    /// HTTP status code for this outcome.
    pub fn http_status(self) -> u16 {
        match self {
            Outcome::Found => 200,
            Outcome::NotFound => 404,
            Outcome::Invalid => 400,
            Outcome::Internal => 500,
        }
    }

    /// gRPC status for this outcome.
    pub fn rpc_status(self) -> RpcStatus {
        match self {
            Outcome::Found => RpcStatus::Ok,
            Outcome::NotFound => RpcStatus::NotFound,
            Outcome::Invalid => RpcStatus::InvalidArgument,
            Outcome::Internal => RpcStatus::Error,
        }
    }

    /// Metrics status label in the vocabulary of `transport`.
    pub fn status_for(self, transport: Transport) -> RequestStatus {
        match transport {
            Transport::Http => {
                RequestStatus::Http(HttpStatusClass::from_code(self.http_status()))
            }
            Transport::Grpc => RequestStatus::Rpc(self.rpc_status()),
        }
    }
}

impl<T> Lookup<T> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Lookup::Found(_) => Outcome::Found,
            Lookup::NotFound => Outcome::NotFound,
            Lookup::Invalid(_) => Outcome::Invalid,
            Lookup::Internal(_) => Outcome::Internal,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        self.and_then(|value| Lookup::Found(f(value)))
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Invalid(reason) => Lookup::Invalid(reason),
            Lookup::Internal(cause) => Lookup::Internal(cause),
        }
    }
}

impl<T> From<Result<T>> for Lookup<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(PackError::NotFound(_)) => Lookup::NotFound,
            Err(PackError::InvalidInput(reason)) => Lookup::Invalid(reason),
            Err(other) => Lookup::Internal(other.to_string()),
        }
    }
}

/// Check that `id` is usable as a pack identifier.
///
/// Accepted: 1 to [`MAX_PACK_ID_LEN`] bytes of ASCII alphanumerics, `-`, `_`
/// and `.`.
pub fn validate_pack_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PackError::InvalidInput("pack id must not be empty".to_string()));
    }
    if id.len() > MAX_PACK_ID_LEN {
        return Err(PackError::InvalidInput(format!(
            "pack id longer than {MAX_PACK_ID_LEN} bytes"
        )));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(PackError::InvalidInput(format!(
            "pack id contains invalid character {c:?}"
        )));
    }
    Ok(())
}

/// Catalog lookups shared by every transport.
#[derive(Clone)]
pub struct PackLookup {
    store: Arc<dyn CatalogStore>,
    metrics: Arc<MetricsCollector>,
}

impl PackLookup {
    /// Wrap a store and publish its size to the available-packs gauge.
    pub fn new(store: Arc<dyn CatalogStore>, metrics: Arc<MetricsCollector>) -> Self {
        metrics.set_available_count(store.len());
        Self { store, metrics }
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Every pack summary and the total. Never fails.
    pub fn list(&self) -> Lookup<PackList> {
        let list = PackList::from(self.store.list_summaries());
        self.metrics.record_operation_kind(OperationKind::List);
        Lookup::Found(list)
    }

    /// Summary of one pack.
    pub fn info(&self, id: &str) -> Lookup<PackSummary> {
        self.lookup(id, OperationKind::Info, |store| store.get_summary(id))
    }

    /// Full content of one pack.
    pub fn content(&self, id: &str) -> Lookup<Arc<Pack>> {
        self.lookup(id, OperationKind::Content, |store| store.get_full(id))
    }

    /// Whether a pack exists. Unknown ids are `Found(false)`, not `NotFound`.
    pub fn exists(&self, id: &str) -> Lookup<bool> {
        self.lookup(id, OperationKind::Exists, |store| Some(store.exists(id)))
    }

    fn lookup<T>(
        &self,
        id: &str,
        kind: OperationKind,
        get: impl FnOnce(&dyn CatalogStore) -> Option<T>,
    ) -> Lookup<T> {
        if let Err(e) = validate_pack_id(id) {
            return Lookup::from(Err(e));
        }
        match get(self.store.as_ref()) {
            Some(value) => {
                self.metrics.record_operation_kind(kind);
                Lookup::Found(value)
            }
            None => Lookup::NotFound,
        }
    }

    /// Run one adapter operation and record it.
    ///
    /// `f` runs synchronously under panic capture; a panic becomes
    /// [`Lookup::Internal`]. Exactly one request sample is recorded for
    /// `(transport, operation)` whatever the outcome, with the elapsed time
    /// of `f` alone.
    pub fn serve<T>(
        &self,
        transport: Transport,
        operation: &'static str,
        pack_id: Option<&str>,
        f: impl FnOnce(&Self) -> Lookup<T>,
    ) -> Lookup<T> {
        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)))
            .unwrap_or_else(|payload| Lookup::Internal(panic_message(payload.as_ref())));
        let elapsed = started.elapsed();

        let outcome = result.outcome();
        self.metrics
            .record_request(transport, operation, outcome.status_for(transport), elapsed);

        let pack_id = pack_id.unwrap_or("");
        match &result {
            Lookup::Found(_) => {}
            Lookup::NotFound => {
                debug!(transport = transport.as_str(), operation, pack_id, "pack not found");
            }
            Lookup::Invalid(reason) => {
                debug!(transport = transport.as_str(), operation, pack_id, %reason, "invalid request");
            }
            Lookup::Internal(cause) => {
                error!(transport = transport.as_str(), operation, pack_id, %cause, "request failed");
            }
        }
        result
    }
}

impl std::fmt::Debug for PackLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackLookup")
            .field("packs", &self.store.len())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}
