//! In-memory catalog populated once at startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::{CatalogStore, projector};
use crate::types::{Pack, PackSummary};
use crate::{PackError, Result};

/// Catalog shipped with the binary.
const EMBEDDED_PACKS: &str = include_str!("../../data/packs.json");

/// Catalog held entirely in memory.
///
/// Packs are kept in insertion order and indexed by id. Each pack sits behind
/// an `Arc`, so full-content lookups hand out shared references instead of
/// cloning the tree.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    packs: Vec<Arc<Pack>>,
    index: HashMap<String, usize>,
}

impl MemoryCatalog {
    /// Build a catalog from validated packs.
    ///
    /// Fails if two packs share an id.
    pub fn new(packs: impl IntoIterator<Item = Pack>) -> Result<Self> {
        let mut catalog = Self::default();
        for pack in packs {
            if catalog.index.contains_key(pack.id()) {
                return Err(PackError::Catalog(format!(
                    "duplicate pack id {:?}",
                    pack.id()
                )));
            }
            catalog
                .index
                .insert(pack.id().to_string(), catalog.packs.len());
            catalog.packs.push(Arc::new(pack));
        }
        Ok(catalog)
    }

    /// Parse a JSON array of pack records.
    pub fn from_json(json: &str) -> Result<Self> {
        let packs: Vec<Pack> = serde_json::from_str(json)?;
        Self::new(packs)
    }

    /// Load a catalog fixture from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PackError::Configuration(format!("Failed to read catalog file {path:?}: {e}"))
        })?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), packs = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// The catalog bundled with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_PACKS)
    }

    fn get(&self, id: &str) -> Option<&Arc<Pack>> {
        self.index.get(id).map(|&i| &self.packs[i])
    }
}

impl CatalogStore for MemoryCatalog {
    fn list_summaries(&self) -> Vec<PackSummary> {
        self.packs.iter().map(|p| projector::to_summary(p)).collect()
    }

    fn get_summary(&self, id: &str) -> Option<PackSummary> {
        self.get(id).map(|p| projector::to_summary(p))
    }

    fn get_full(&self, id: &str) -> Option<Arc<Pack>> {
        self.get(id).map(projector::to_full)
    }

    fn exists(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn len(&self) -> usize {
        self.packs.len()
    }
}
