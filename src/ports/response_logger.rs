//! Observability ports.
//!
//! - `ResponseLogger` - optional per-call sink, told about every answered
//!   sentence and every sentence that fell back to the default response
//! - `ConversationLog` - injected at construction, told about every
//!   question/response pair the pipeline produces

use crate::application::RequestContext;
use crate::domain::dialog::Sentence;

/// Per-call sink for answer coverage tracking.
pub trait ResponseLogger: Send + Sync {
    /// A sentence was answered.
    fn log_response(&self, text: &str, answer: &str);

    /// No answer was found for a sentence; the default response was used.
    fn log_unknown_response(&self, sentence: &Sentence);
}

/// Observer for complete question/response pairs.
pub trait ConversationLog: Send + Sync {
    fn log_question_and_response(&self, ctx: &RequestContext, text: &str, response: &str);
}
