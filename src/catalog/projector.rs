//! Pack projections shared by both transports.
//!
//! Transports never build response payloads from a [`Pack`] directly; they go
//! through these functions so that the HTTP and gRPC surfaces stay in step.

use std::sync::Arc;

use crate::types::{Pack, PackSummary};

/// Drop the rounds, keeping metadata and counters.
pub fn to_summary(pack: &Pack) -> PackSummary {
    PackSummary {
        id: pack.id().to_string(),
        name: pack.name().to_string(),
        author: pack.author().to_string(),
        description: pack.description().to_string(),
        rounds_count: pack.rounds_count(),
        questions_count: pack.questions_count(),
        has_media: pack.has_media(),
        created_at: pack.created_at().to_string(),
    }
}

/// The full pack. Stored packs are already complete, so this shares the
/// stored tree rather than copying it.
pub fn to_full(pack: &Arc<Pack>) -> Arc<Pack> {
    Arc::clone(pack)
}
