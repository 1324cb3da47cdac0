//! Catalog data model.

mod health;
mod pack;
mod question;

pub use health::HealthResponse;
pub use pack::{APPROVED_STATUS, Pack, PackList, PackRecord, PackSummary, Round, Theme};
pub use question::{MediaKind, Question, QuestionKind};
