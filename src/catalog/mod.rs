//! Pack catalog storage.
//!
//! The [`CatalogStore`] trait is the only thing the transports see. The
//! bundled [`MemoryCatalog`] keeps every pack resident and immutable, so
//! lookups never block and never need coordination between readers.

mod memory;
pub mod projector;

use std::sync::Arc;

use crate::types::{Pack, PackSummary};

pub use memory::MemoryCatalog;

/// Read-only access to the pack catalog.
///
/// Absence is not an error: unknown ids yield `None`/`false`.
pub trait CatalogStore: Send + Sync {
    /// Every pack summary, in insertion order.
    fn list_summaries(&self) -> Vec<PackSummary>;

    /// Summary for `id`, or `None` if unknown.
    fn get_summary(&self, id: &str) -> Option<PackSummary>;

    /// Complete pack tree for `id`, or `None` if unknown.
    fn get_full(&self, id: &str) -> Option<Arc<Pack>>;

    /// Whether a pack with `id` is stored.
    fn exists(&self, id: &str) -> bool;

    /// Number of stored packs.
    fn len(&self) -> usize;

    /// Whether the catalog holds no packs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
