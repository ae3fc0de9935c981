//! Storage Adapters
//!
//! Implementations of the ConversationStorage port.
//!
//! ## Available Adapters
//!
//! - **FileConversationStorage** - One YAML (or JSON) file per user
//! - **InMemoryConversationStorage** - Stores conversations in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileConversationStorage, InMemoryConversationStorage};
//!
//! // Production: file-based storage
//! let storage = FileConversationStorage::new("./data/conversations");
//!
//! // Testing: in-memory storage
//! let storage = InMemoryConversationStorage::new();
//! ```

mod file_conversation_storage;
mod in_memory_conversation_storage;

pub use file_conversation_storage::FileConversationStorage;
pub use in_memory_conversation_storage::InMemoryConversationStorage;

use std::sync::Arc;

use crate::config::{ConversationsConfig, StorageKind};
use crate::ports::ConversationStorage;

/// Builds the configured storage backend, if any.
pub fn storage_from_config(config: &ConversationsConfig) -> Option<Arc<dyn ConversationStorage>> {
    match (config.storage?, config.path.as_deref()) {
        (StorageKind::Memory, _) => Some(Arc::new(InMemoryConversationStorage::new())),
        (StorageKind::File, Some(path)) => {
            Some(Arc::new(FileConversationStorage::new(path).with_format(config.format)))
        }
        (StorageKind::File, None) => {
            tracing::error!("File conversation storage configured without a path");
            None
        }
    }
}
