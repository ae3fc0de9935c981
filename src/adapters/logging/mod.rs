//! Observability adapters.

mod recording;
mod tracing_conversation_log;

pub use recording::{LoggedExchange, RecordingConversationLog, RecordingResponseLogger};
pub use tracing_conversation_log::{TracingConversationLog, CONVERSATION_TARGET};
