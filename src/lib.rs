//! pack-service - read-only question pack catalog
//!
//! Serves an in-memory catalog of question packs (pack → rounds → themes →
//! questions) over HTTP/JSON and gRPC. Both transports share one lookup
//! layer ([`PackLookup`]), so validation, not-found semantics and metrics
//! cannot drift between them.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pack_service::{MemoryCatalog, MetricsCollector, PackLookup};
//!
//! fn main() -> pack_service::Result<()> {
//!     let catalog = Arc::new(MemoryCatalog::embedded()?);
//!     let metrics = Arc::new(MetricsCollector::new()?);
//!     let lookup = PackLookup::new(catalog, metrics);
//!
//!     let list = lookup.list();
//!     assert!(list.is_found());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `server`: axum router, tonic servicer, config loading and the `packd` binary
//! - `client`: gRPC and HTTP clients and the `pack` binary

pub mod catalog;
pub mod error;
pub mod lookup;
pub mod telemetry;
pub mod types;
mod version;

#[cfg(any(feature = "server", feature = "client"))]
pub mod server;

#[cfg(feature = "client")]
pub mod client;

// Re-export main types at crate root
pub use catalog::{CatalogStore, MemoryCatalog};
pub use error::{PackError, Result};
pub use lookup::{Lookup, Outcome, PackLookup};
pub use telemetry::MetricsCollector;
pub use types::{
    HealthResponse, MediaKind, Pack, PackList, PackRecord, PackSummary, Question, QuestionKind,
    Round, Theme,
};
pub use version::{PKG_VERSION, SERVICE_NAME, version_string};

#[cfg(feature = "client")]
pub use client::{HttpCatalogClient, PackClient};
