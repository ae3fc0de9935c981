//! Recording sinks that keep everything they are told.
//!
//! Useful for tests and for clients that report unanswered questions.

use std::sync::{Mutex, PoisonError};

use crate::application::RequestContext;
use crate::domain::dialog::Sentence;
use crate::domain::foundation::UserId;
use crate::ports::{ConversationLog, ResponseLogger};

/// One question/response pair seen by [`RecordingConversationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedExchange {
    pub user_id: UserId,
    pub depth: u32,
    pub question: String,
    pub response: String,
}

/// Conversation log that stores every exchange in memory.
#[derive(Debug, Default)]
pub struct RecordingConversationLog {
    exchanges: Mutex<Vec<LoggedExchange>>,
}

impl RecordingConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exchanges(&self) -> Vec<LoggedExchange> {
        self.exchanges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Exchanges logged at the given redirect depth.
    pub fn at_depth(&self, depth: u32) -> Vec<LoggedExchange> {
        self.exchanges()
            .into_iter()
            .filter(|exchange| exchange.depth == depth)
            .collect()
    }
}

impl ConversationLog for RecordingConversationLog {
    fn log_question_and_response(&self, ctx: &RequestContext, text: &str, response: &str) {
        self.exchanges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedExchange {
                user_id: ctx.user_id().clone(),
                depth: ctx.depth(),
                question: text.to_string(),
                response: response.to_string(),
            });
    }
}

/// Response logger that stores answered and unanswered sentences.
#[derive(Debug, Default)]
pub struct RecordingResponseLogger {
    responses: Mutex<Vec<(String, String)>>,
    unknown: Mutex<Vec<String>>,
}

impl RecordingResponseLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// (sentence, answer) pairs in the order they were answered.
    pub fn responses(&self) -> Vec<(String, String)> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sentences that fell back to the default response.
    pub fn unknown(&self) -> Vec<String> {
        self.unknown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResponseLogger for RecordingResponseLogger {
    fn log_response(&self, text: &str, answer: &str) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((text.to_string(), answer.to_string()));
    }

    fn log_unknown_response(&self, sentence: &Sentence) {
        self.unknown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sentence.text().to_string());
    }
}
