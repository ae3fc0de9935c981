//! Conversation log backed by `tracing`.

use crate::application::RequestContext;
use crate::ports::ConversationLog;

/// Target of question/response events, so they can be filtered or routed
/// on their own (`RUST_LOG=conversation=info`).
pub const CONVERSATION_TARGET: &str = "conversation";

/// Emits each question/response pair as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConversationLog;

impl ConversationLog for TracingConversationLog {
    fn log_question_and_response(&self, ctx: &RequestContext, text: &str, response: &str) {
        tracing::info!(
            target: CONVERSATION_TARGET,
            user = %ctx.user_id(),
            request = %ctx.request_id(),
            depth = ctx.depth(),
            "Question[{}], Response[{}]",
            text,
            response
        );
    }
}
