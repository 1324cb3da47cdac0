//! Pack hierarchy: packs → rounds → themes → questions.
//!
//! [`Pack`] is the only validated type: its fields are private and it can only
//! be built from a [`PackRecord`] through [`Pack::from_record`] (or serde,
//! which routes through the same check). Once built, a pack is never mutated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Question;
use crate::lookup::validate_pack_id;
use crate::{PackError, Result};

/// Approval status reported for every catalog pack.
///
/// The catalog is curated ahead of time, so there is no moderation state to
/// track; every stored pack is approved.
pub const APPROVED_STATUS: &str = "approved";

/// A named group of questions inside a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Unique within its round.
    pub id: String,
    pub name: String,
    /// Display order.
    pub questions: Vec<Question>,
}

/// One round of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Unique within its pack.
    pub id: String,
    /// Starts at 1; ascending but not necessarily contiguous.
    pub round_number: u32,
    pub name: String,
    pub themes: Vec<Theme>,
}

impl Round {
    /// Number of questions across all themes of this round.
    pub fn question_count(&self) -> usize {
        self.themes.iter().map(|t| t.questions.len()).sum()
    }
}

/// Raw pack as it appears in a catalog fixture, before validation.
///
/// The counters are declared by the fixture author and checked against the
/// nested structure when the record is turned into a [`Pack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackRecord {
    pub id: String,
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub rounds_count: u32,
    pub questions_count: u32,
    /// ISO-8601 timestamp.
    pub created_at: String,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

/// A validated, immutable pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PackRecord")]
pub struct Pack {
    id: String,
    name: String,
    author: String,
    description: String,
    rounds_count: u32,
    questions_count: u32,
    has_media: bool,
    created_at: String,
    rounds: Vec<Round>,
}

impl Pack {
    /// Validate a fixture record and build the pack.
    ///
    /// Fails when the declared counters disagree with the nested structure,
    /// when identifiers repeat within a scope, or when a required field is
    /// empty.
    pub fn from_record(record: PackRecord) -> Result<Self> {
        validate(&record)?;
        let has_media = record
            .rounds
            .iter()
            .flat_map(|r| &r.themes)
            .flat_map(|t| &t.questions)
            .any(Question::has_media);

        Ok(Self {
            id: record.id,
            name: record.name,
            author: record.author,
            description: record.description,
            rounds_count: record.rounds_count,
            questions_count: record.questions_count,
            has_media,
            created_at: record.created_at,
            rounds: record.rounds,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rounds_count(&self) -> u32 {
        self.rounds_count
    }

    pub fn questions_count(&self) -> u32 {
        self.questions_count
    }

    /// Whether any question carries image, audio or video media.
    pub fn has_media(&self) -> bool {
        self.has_media
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Approval status; see [`APPROVED_STATUS`].
    pub fn status(&self) -> &'static str {
        APPROVED_STATUS
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }
}

impl TryFrom<PackRecord> for Pack {
    type Error = PackError;

    fn try_from(record: PackRecord) -> Result<Self> {
        Pack::from_record(record)
    }
}

/// Pack metadata without rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub rounds_count: u32,
    pub questions_count: u32,
    #[serde(default)]
    pub has_media: bool,
    pub created_at: String,
}

/// Every pack summary in the catalog, plus the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackList {
    pub packs: Vec<PackSummary>,
    pub total: usize,
}

impl From<Vec<PackSummary>> for PackList {
    fn from(packs: Vec<PackSummary>) -> Self {
        let total = packs.len();
        Self { packs, total }
    }
}

// =============================================================================
// Validation
// =============================================================================

fn invalid(pack_id: &str, reason: impl std::fmt::Display) -> PackError {
    PackError::Catalog(format!("pack {pack_id:?}: {reason}"))
}

fn require_non_empty(pack_id: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(pack_id, format!("{field} must not be empty")));
    }
    Ok(())
}

fn looks_like_iso8601(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

fn validate(record: &PackRecord) -> Result<()> {
    let pid = record.id.as_str();
    // Stored ids must be servable by every transport.
    validate_pack_id(pid).map_err(|e| invalid(pid, e))?;
    require_non_empty(pid, "name", &record.name)?;
    require_non_empty(pid, "author", &record.author)?;
    if !looks_like_iso8601(&record.created_at) {
        return Err(invalid(
            pid,
            format!("created_at {:?} is not an ISO-8601 timestamp", record.created_at),
        ));
    }

    let mut round_ids = HashSet::new();
    let mut questions = 0usize;
    for round in &record.rounds {
        require_non_empty(pid, "round id", &round.id)?;
        require_non_empty(pid, "round name", &round.name)?;
        if !round_ids.insert(round.id.as_str()) {
            return Err(invalid(pid, format!("duplicate round id {:?}", round.id)));
        }
        if round.round_number == 0 {
            return Err(invalid(pid, format!("round {:?} has round_number 0", round.id)));
        }

        let mut theme_ids = HashSet::new();
        for theme in &round.themes {
            require_non_empty(pid, "theme id", &theme.id)?;
            require_non_empty(pid, "theme name", &theme.name)?;
            if !theme_ids.insert(theme.id.as_str()) {
                return Err(invalid(
                    pid,
                    format!("duplicate theme id {:?} in round {:?}", theme.id, round.id),
                ));
            }

            let mut question_ids = HashSet::new();
            for q in &theme.questions {
                require_non_empty(pid, "question id", &q.id)?;
                require_non_empty(pid, "question text", &q.text)?;
                require_non_empty(pid, "question answer", &q.answer)?;
                if !question_ids.insert(q.id.as_str()) {
                    return Err(invalid(
                        pid,
                        format!("duplicate question id {:?} in theme {:?}", q.id, theme.id),
                    ));
                }
                if !q.media_type.is_timed() && q.media_duration_ms != 0 {
                    return Err(invalid(
                        pid,
                        format!(
                            "question {:?} has {} media with a duration",
                            q.id,
                            q.media_type.as_str()
                        ),
                    ));
                }
            }
            questions += theme.questions.len();
        }
    }

    if record.rounds.len() != record.rounds_count as usize {
        return Err(invalid(
            pid,
            format!(
                "rounds_count is {} but the pack has {} rounds",
                record.rounds_count,
                record.rounds.len()
            ),
        ));
    }
    if questions != record.questions_count as usize {
        return Err(invalid(
            pid,
            format!(
                "questions_count is {} but the pack has {questions} questions",
                record.questions_count
            ),
        ));
    }
    Ok(())
}
