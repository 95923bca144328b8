//! Core domain entities
//!
//! All records are defined here. These are pure data structures with
//! validation logic - no I/O or external dependencies.

mod note;
pub mod quiz;
pub mod result;
mod user;

use chrono::{DateTime, SubsecRound, Utc};

pub use note::{Note, PREVIEW_CHARS};
pub use quiz::{AnswerRecord, Question, QuizProgress, QuizResult, QuizState, ScoreTier, QUESTION_BANK};
pub use user::User;

/// Current time at the precision the store keeps (milliseconds)
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
