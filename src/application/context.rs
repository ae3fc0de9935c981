//! Per-request context threaded through every pipeline call.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::OwnedMutexGuard;

use crate::domain::dialog::{Conversation, GuardLimits, GuardViolation};
use crate::domain::foundation::{RequestId, UserId};
use crate::ports::KnowledgeEngine;

use super::PipelineError;

/// State carried by one user's request, including all nested sub-queries.
///
/// A top-level call binds the engine, resets the depth and records the
/// start time; sub-queries share all three. While a call is active the
/// context also holds the lock on the user's conversation, so nested calls
/// reach the same conversation without locking it again.
pub struct RequestContext {
    user_id: UserId,
    request_id: RequestId,
    depth: u32,
    started_at: Option<Instant>,
    engine: Option<Arc<dyn KnowledgeEngine>>,
    conversation: Option<OwnedMutexGuard<Conversation>>,
    resolving_fallback: bool,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_id: RequestId::new(),
            depth: 0,
            started_at: None,
            engine: None,
            conversation: None,
            resolving_fallback: false,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Identifier of the current top-level question.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Current redirect depth; 0 at top level.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether a question is in progress on this context.
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the top-level question started; zero when idle.
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    pub fn engine(&self) -> Result<&Arc<dyn KnowledgeEngine>, PipelineError> {
        self.engine.as_ref().ok_or(PipelineError::NotBound("engine"))
    }

    pub fn is_engine_bound(&self) -> bool {
        self.engine.is_some()
    }

    /// The conversation locked by the call in progress.
    pub fn conversation(&self) -> Result<&Conversation, PipelineError> {
        self.conversation
            .as_deref()
            .ok_or(PipelineError::NotBound("conversation"))
    }

    pub fn conversation_mut(&mut self) -> Result<&mut Conversation, PipelineError> {
        self.conversation
            .as_deref_mut()
            .ok_or(PipelineError::NotBound("conversation"))
    }

    pub fn has_conversation(&self) -> bool {
        self.conversation.is_some()
    }

    /// Checks depth and elapsed time against `limits`.
    pub fn check_guards(&self, limits: &GuardLimits) -> Result<(), GuardViolation> {
        limits.check(self.depth, self.elapsed())
    }

    // === Pipeline bookkeeping ===

    pub(crate) fn bind_engine(&mut self, engine: Arc<dyn KnowledgeEngine>) {
        self.engine = Some(engine);
    }

    pub(crate) fn attach_conversation(&mut self, guard: OwnedMutexGuard<Conversation>) {
        self.conversation = Some(guard);
    }

    /// Releases the conversation lock.
    pub(crate) fn detach_conversation(&mut self) -> Option<OwnedMutexGuard<Conversation>> {
        self.conversation.take()
    }

    pub(crate) fn begin_question(&mut self) {
        self.request_id = RequestId::new();
        self.depth = 0;
        self.started_at = Some(Instant::now());
    }

    pub(crate) fn end_question(&mut self) {
        self.depth = 0;
        self.started_at = None;
    }

    pub(crate) fn enter_sub_query(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave_sub_query(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn is_resolving_fallback(&self) -> bool {
        self.resolving_fallback
    }

    /// Sets the fallback flag and returns its previous value.
    pub(crate) fn set_resolving_fallback(&mut self, resolving: bool) -> bool {
        std::mem::replace(&mut self.resolving_fallback, resolving)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("user_id", &self.user_id)
            .field("request_id", &self.request_id)
            .field("depth", &self.depth)
            .field("elapsed", &self.elapsed())
            .field("engine", &self.engine.as_ref().map(|engine| engine.id()))
            .field("conversation_bound", &self.conversation.is_some())
            .finish()
    }
}
