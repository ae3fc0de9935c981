//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and its collaborators. Adapters implement these ports.
//!
//! - `KnowledgeEngine` / `SubQueryResolver` - the matching engine and its
//!   callback for redirects
//! - `SpellChecker` - spelling correction
//! - `ConversationStorage` - durable conversation state
//! - `SentenceSplitter` - sentence segmentation
//! - `ResponseLogger` / `ConversationLog` - observability sinks

mod conversation_storage;
mod knowledge_engine;
mod response_logger;
mod sentence_splitter;
mod spell_checker;

pub use conversation_storage::{ConversationStorage, StorageError};
pub use knowledge_engine::{KnowledgeEngine, SubQueryResolver};
pub use response_logger::{ConversationLog, ResponseLogger};
pub use sentence_splitter::SentenceSplitter;
pub use spell_checker::SpellChecker;
