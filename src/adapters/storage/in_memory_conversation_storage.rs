//! In-Memory Conversation Storage Adapter
//!
//! Stores conversations in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialog::Conversation;
use crate::domain::foundation::UserId;
use crate::ports::{ConversationStorage, StorageError};

/// In-memory storage for conversations
#[derive(Debug, Clone)]
pub struct InMemoryConversationStorage {
    conversations: Arc<RwLock<HashMap<UserId, Conversation>>>,
}

impl InMemoryConversationStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a copy of what is stored for a user (useful for tests)
    pub async fn stored(&self, user_id: &UserId) -> Option<Conversation> {
        self.conversations.read().await.get(user_id).cloned()
    }

    /// Get the number of stored conversations
    pub async fn count(&self) -> usize {
        self.conversations.read().await.len()
    }
}

impl Default for InMemoryConversationStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStorage for InMemoryConversationStorage {
    async fn empty(&self) -> Result<(), StorageError> {
        self.conversations.write().await.clear();
        Ok(())
    }

    async fn load_conversation(
        &self,
        conversation: &mut Conversation,
        user_id: &UserId,
        restore_last_topic: bool,
    ) -> Result<bool, StorageError> {
        let stored = self.conversations.read().await.get(user_id).cloned();
        match stored {
            Some(stored) => {
                conversation.restore_from(stored, restore_last_topic);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_conversation(
        &self,
        conversation: &Conversation,
        user_id: &UserId,
    ) -> Result<(), StorageError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(user_id.clone(), conversation.clone());
        Ok(())
    }
}
