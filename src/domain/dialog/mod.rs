//! Dialog domain - questions, sentences and per-user conversations.
//!
//! Pure data and rules, no I/O:
//!
//! - `Sentence` / `Question` - an utterance split into ordered units
//! - `Conversation` - history (with sub-query push/pop) and variables
//! - `GuardLimits` - recursion depth and elapsed-time checks
//! - `combine_answers` - joins per-sentence answers into one reply

mod conversation;
mod guard;
mod question;
mod sentence;

pub use conversation::{Conversation, DEFAULT_MAX_HISTORIES, DEFAULT_TOPIC, TOPIC_VARIABLE};
pub use guard::{GuardLimits, GuardViolation};
pub use question::Question;
pub use sentence::Sentence;

/// Separator placed between sentence answers.
pub const ANSWER_SEPARATOR: &str = ". ";

/// Joins answers in order with [`ANSWER_SEPARATOR`], skipping `None`.
pub fn combine_answers(answers: &[Option<String>]) -> String {
    answers
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(ANSWER_SEPARATOR)
}
