//! Question types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PackError;

/// Media attached to a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Plain text question, no attachment.
    #[default]
    Text,
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Wire name (`"text"`, `"image"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Text => "text",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Audio and video have a playback duration; text and images do not.
    pub fn is_timed(self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }
}

impl FromStr for MediaKind {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "" => Ok(MediaKind::Text),
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            other => Err(PackError::InvalidInput(format!("unknown media type {other:?}"))),
        }
    }
}

/// Gameplay variant of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    #[default]
    Normal,
    /// "Cat in the bag": handed to another player.
    Secret,
    /// Auction question; players bid for it.
    Stake,
    /// Every player answers.
    ForAll,
}

impl QuestionKind {
    /// Wire name (`"normal"`, `"secret"`, `"stake"`, `"forAll"`).
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Normal => "normal",
            QuestionKind::Secret => "secret",
            QuestionKind::Stake => "stake",
            QuestionKind::ForAll => "forAll",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" | "" => Ok(QuestionKind::Normal),
            "secret" => Ok(QuestionKind::Secret),
            "stake" => Ok(QuestionKind::Stake),
            "forAll" => Ok(QuestionKind::ForAll),
            other => Err(PackError::InvalidInput(format!("unknown question type {other:?}"))),
        }
    }
}

/// A single priced question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within its theme.
    pub id: String,
    pub price: u32,
    pub text: String,
    pub answer: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub media_type: MediaKind,
    #[serde(default)]
    pub media_url: Option<String>,
    /// Playback length; always 0 for non-timed media.
    #[serde(default)]
    pub media_duration_ms: u32,
}

impl Question {
    /// Create a plain text question.
    pub fn text(
        id: impl Into<String>,
        price: u32,
        text: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            price,
            text: text.into(),
            answer: answer.into(),
            kind: QuestionKind::Normal,
            media_type: MediaKind::Text,
            media_url: None,
            media_duration_ms: 0,
        }
    }

    /// Attach media to this question.
    pub fn with_media(mut self, kind: MediaKind, url: impl Into<String>, duration_ms: u32) -> Self {
        self.media_type = kind;
        self.media_url = Some(url.into());
        self.media_duration_ms = duration_ms;
        self
    }

    /// Set the gameplay variant.
    pub fn with_kind(mut self, kind: QuestionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the question carries a non-text attachment.
    pub fn has_media(&self) -> bool {
        self.media_type != MediaKind::Text
    }
}
