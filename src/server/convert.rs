//! Conversions between native catalog types and protobuf types.
//!
//! Server-side conversions (native → proto) are fallible only because proto
//! counters are `int32`; an overflow is an encoding failure, never a silent
//! truncation. Client-side conversions (proto → native) rebuild a validated
//! [`Pack`] so a remote catalog is held to the same invariants as a local one.

use crate::types::{
    APPROVED_STATUS, Pack, PackRecord, PackSummary, Question, Round, Theme,
};
use crate::{PackError, Result};

use super::proto;

fn to_i32(field: &str, value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| PackError::Encoding(format!("{field} {value} does not fit in int32")))
}

fn to_u32(field: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| PackError::InvalidInput(format!("{field} must not be negative, got {value}")))
}

// =============================================================================
// From Native → Proto (outgoing responses)
// =============================================================================

impl TryFrom<&PackSummary> for proto::PackInfoResponse {
    type Error = PackError;

    fn try_from(s: &PackSummary) -> Result<Self> {
        Ok(proto::PackInfoResponse {
            found: true,
            pack_id: s.id.clone(),
            name: s.name.clone(),
            author: s.author.clone(),
            description: s.description.clone(),
            rounds_count: to_i32("rounds_count", s.rounds_count)?,
            questions_count: to_i32("questions_count", s.questions_count)?,
            has_media: s.has_media,
            status: APPROVED_STATUS.to_string(),
            created_at: s.created_at.clone(),
        })
    }
}

impl TryFrom<&Pack> for proto::PackContentResponse {
    type Error = PackError;

    fn try_from(p: &Pack) -> Result<Self> {
        Ok(proto::PackContentResponse {
            found: true,
            pack_id: p.id().to_string(),
            name: p.name().to_string(),
            author: p.author().to_string(),
            description: p.description().to_string(),
            rounds_count: to_i32("rounds_count", p.rounds_count())?,
            questions_count: to_i32("questions_count", p.questions_count())?,
            has_media: p.has_media(),
            status: p.status().to_string(),
            created_at: p.created_at().to_string(),
            rounds: p
                .rounds()
                .iter()
                .map(proto::Round::try_from)
                .collect::<Result<Vec<_>>>()?,
            error: String::new(),
        })
    }
}

impl TryFrom<&Round> for proto::Round {
    type Error = PackError;

    fn try_from(r: &Round) -> Result<Self> {
        Ok(proto::Round {
            id: r.id.clone(),
            round_number: to_i32("round_number", r.round_number)?,
            name: r.name.clone(),
            themes: r
                .themes
                .iter()
                .map(proto::Theme::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl TryFrom<&Theme> for proto::Theme {
    type Error = PackError;

    fn try_from(t: &Theme) -> Result<Self> {
        Ok(proto::Theme {
            id: t.id.clone(),
            name: t.name.clone(),
            questions: t
                .questions
                .iter()
                .map(proto::Question::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl TryFrom<&Question> for proto::Question {
    type Error = PackError;

    fn try_from(q: &Question) -> Result<Self> {
        Ok(proto::Question {
            id: q.id.clone(),
            price: to_i32("price", q.price)?,
            text: q.text.clone(),
            answer: q.answer.clone(),
            question_type: q.kind.as_str().to_string(),
            media_type: q.media_type.as_str().to_string(),
            media_url: q.media_url.clone(),
            media_duration_ms: to_i32("media_duration_ms", q.media_duration_ms)?,
        })
    }
}

// =============================================================================
// From Proto → Native (incoming responses, client side)
// =============================================================================

impl TryFrom<proto::PackInfoResponse> for PackSummary {
    type Error = PackError;

    fn try_from(p: proto::PackInfoResponse) -> Result<Self> {
        Ok(PackSummary {
            id: p.pack_id,
            name: p.name,
            author: p.author,
            description: p.description,
            rounds_count: to_u32("rounds_count", p.rounds_count)?,
            questions_count: to_u32("questions_count", p.questions_count)?,
            has_media: p.has_media,
            created_at: p.created_at,
        })
    }
}

impl TryFrom<proto::PackContentResponse> for Pack {
    type Error = PackError;

    fn try_from(p: proto::PackContentResponse) -> Result<Self> {
        if !p.error.is_empty() {
            return Err(PackError::Rpc {
                code: "ERROR".to_string(),
                message: p.error,
            });
        }
        let record = PackRecord {
            id: p.pack_id,
            name: p.name,
            author: p.author,
            description: p.description,
            rounds_count: to_u32("rounds_count", p.rounds_count)?,
            questions_count: to_u32("questions_count", p.questions_count)?,
            created_at: p.created_at,
            rounds: p
                .rounds
                .into_iter()
                .map(Round::try_from)
                .collect::<Result<Vec<_>>>()?,
        };
        Pack::from_record(record)
    }
}

impl TryFrom<proto::Round> for Round {
    type Error = PackError;

    fn try_from(p: proto::Round) -> Result<Self> {
        Ok(Round {
            id: p.id,
            round_number: to_u32("round_number", p.round_number)?,
            name: p.name,
            themes: p
                .themes
                .into_iter()
                .map(Theme::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl TryFrom<proto::Theme> for Theme {
    type Error = PackError;

    fn try_from(p: proto::Theme) -> Result<Self> {
        Ok(Theme {
            id: p.id,
            name: p.name,
            questions: p
                .questions
                .into_iter()
                .map(Question::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl TryFrom<proto::Question> for Question {
    type Error = PackError;

    fn try_from(p: proto::Question) -> Result<Self> {
        Ok(Question {
            id: p.id,
            price: to_u32("price", p.price)?,
            text: p.text,
            answer: p.answer,
            kind: p.question_type.parse()?,
            media_type: p.media_type.parse()?,
            media_url: p.media_url,
            media_duration_ms: to_u32("media_duration_ms", p.media_duration_ms)?,
        })
    }
}
