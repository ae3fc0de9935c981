//! Application layer - the question pipeline and its supporting services.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//!
//! - `Bot` - the `ask_question` pipeline and its entry points
//! - `EngineRegistry` / selectors - which engine answers
//! - `ConversationManager` - one conversation per user
//! - `RequestContext` - per-request depth, clock and bindings

pub mod brain;
mod bot;
mod context;
mod conversations;
mod errors;
mod spelling;

pub use bot::{Bot, BotComponents};
pub use brain::{
    EngineFactory, EngineRegistry, EngineSelector, FifoSelector, RoundRobinSelector,
    SelectorFactory,
};
pub use context::RequestContext;
pub use conversations::{ConversationManager, SharedConversation};
pub use errors::{BotError, PipelineError, RegistryError, SelectorError};
pub use spelling::{SpellCheckerConstructor, SpellCheckerFactory, SpellingOptions};
