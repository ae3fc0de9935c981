//! Knowledge Engine Port - Interface for the pattern-matching "brain".
//!
//! The engine owns pattern/template resolution and variable defaults. The
//! pipeline only needs one capability from it: given a context and a
//! sentence, produce an answer or report no match.
//!
//! # Redirects
//!
//! An engine whose template is itself a redirect to another input re-enters
//! the pipeline through the [`SubQueryResolver`] it is handed. That is the
//! only recursion path, and the reason the pipeline checks its recursion
//! and time guards before every sentence.
//!
//! # Example
//!
//! ```ignore
//! #[async_trait]
//! impl KnowledgeEngine for EchoEngine {
//!     fn id(&self) -> &str { "echo" }
//!
//!     async fn answer(
//!         &self,
//!         resolver: &dyn SubQueryResolver,
//!         ctx: &mut RequestContext,
//!         sentence: &str,
//!         _sub_query: bool,
//!     ) -> Result<Option<String>, PipelineError> {
//!         if let Some(target) = sentence.strip_prefix("say ") {
//!             return resolver.resolve(ctx, target).await.map(Some);
//!         }
//!         Ok(Some(sentence.to_string()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::{PipelineError, RequestContext};

/// Callback into the pipeline for resolving a redirect as a sub-query.
#[async_trait]
pub trait SubQueryResolver: Send + Sync {
    /// Answers `text` as a sub-query of the call in progress on `ctx`.
    ///
    /// The sub-query inherits the context's recursion depth and start time,
    /// and its question never remains in the visible history.
    async fn resolve(&self, ctx: &mut RequestContext, text: &str) -> Result<String, PipelineError>;
}

/// Port for a knowledge-matching engine instance.
#[async_trait]
pub trait KnowledgeEngine: Send + Sync {
    /// Unique identifier; the registry keys engines by it.
    fn id(&self) -> &str;

    /// Answers one sentence.
    ///
    /// Returns `Ok(None)` (or an empty string) for no match. Errors from a
    /// nested [`SubQueryResolver::resolve`] call must be propagated so a
    /// guard failure aborts the whole top-level call.
    async fn answer(
        &self,
        resolver: &dyn SubQueryResolver,
        ctx: &mut RequestContext,
        sentence: &str,
        sub_query: bool,
    ) -> Result<Option<String>, PipelineError>;

    /// Normalises raw user text before it is split into sentences.
    async fn pre_process(&self, _ctx: &RequestContext, text: &str) -> String {
        text.to_string()
    }

    /// Cleans up a raw answer before it is returned to the user.
    async fn post_process(&self, _ctx: &RequestContext, response: &str) -> String {
        response.to_string()
    }

    /// Default variables used to seed new conversations.
    fn variables(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Bot property such as `name`, `version` or `birthdate`.
    fn property(&self, _name: &str) -> Option<String> {
        None
    }
}
