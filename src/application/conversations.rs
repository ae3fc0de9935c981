//! Conversation Manager - one shared conversation per user.
//!
//! Conversations are created on first use, seeded with the answering
//! engine's default variables and then merged with whatever storage holds
//! for the user. The same `Arc` is handed out for every later lookup until
//! the conversation is removed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::dialog::{Conversation, DEFAULT_MAX_HISTORIES};
use crate::domain::foundation::UserId;
use crate::ports::{ConversationStorage, StorageError};

/// A user's conversation, shared between the manager and in-flight calls.
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Owns the user -> conversation map and its optional backing store.
pub struct ConversationManager {
    conversations: RwLock<HashMap<UserId, SharedConversation>>,
    storage: Option<Arc<dyn ConversationStorage>>,
    restore_last_topic: bool,
    max_histories: usize,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORIES)
    }
}

impl ConversationManager {
    /// A manager without storage.
    pub fn new(max_histories: usize) -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            storage: None,
            restore_last_topic: false,
            max_histories,
        }
    }

    /// Restores and saves conversations through `storage`.
    pub fn with_storage(
        mut self,
        storage: Arc<dyn ConversationStorage>,
        restore_last_topic: bool,
    ) -> Self {
        self.storage = Some(storage);
        self.restore_last_topic = restore_last_topic;
        self
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    pub fn max_histories(&self) -> usize {
        self.max_histories
    }

    /// Prepares storage at startup, wiping it when `empty_on_start` is set.
    pub async fn initialise(&self, empty_on_start: bool) -> Result<(), StorageError> {
        if let (Some(storage), true) = (&self.storage, empty_on_start) {
            tracing::info!("Emptying conversation storage on start");
            storage.empty().await?;
        }
        Ok(())
    }

    pub async fn contains(&self, user_id: &UserId) -> bool {
        self.conversations.read().await.contains_key(user_id)
    }

    pub async fn get(&self, user_id: &UserId) -> Option<SharedConversation> {
        self.conversations.read().await.get(user_id).cloned()
    }

    /// Returns the user's conversation, creating it on first use.
    ///
    /// A new conversation is seeded from `initial_variables`, published, and
    /// then merged with stored state. It stays locked from creation until the
    /// merge completes, so no caller ever observes it half loaded.
    pub async fn get_or_create(
        &self,
        user_id: &UserId,
        initial_variables: &HashMap<String, String>,
    ) -> SharedConversation {
        if let Some(existing) = self.get(user_id).await {
            tracing::debug!(user = %user_id, "Retrieved existing conversation");
            return existing;
        }

        let (shared, mut guard) = {
            let mut conversations = self.conversations.write().await;
            if let Some(existing) = conversations.get(user_id) {
                return existing.clone();
            }

            tracing::debug!(user = %user_id, "Creating new conversation");
            let mut conversation = Conversation::new(user_id.clone(), self.max_histories);
            conversation.load_initial_variables(initial_variables);

            let shared = Arc::new(Mutex::new(conversation));
            let guard = shared.clone().lock_owned().await;
            conversations.insert(user_id.clone(), shared.clone());
            (shared, guard)
        };

        if let Some(storage) = &self.storage {
            match storage
                .load_conversation(&mut guard, user_id, self.restore_last_topic)
                .await
            {
                Ok(true) => tracing::debug!(user = %user_id, "Restored stored conversation"),
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(user = %user_id, error = %err, "Failed to load stored conversation")
                }
            }
        }

        shared
    }

    /// Persists the user's conversation.
    ///
    /// Without storage this is a no-op. Waits for any call in progress for
    /// the same user to finish.
    ///
    /// # Errors
    ///
    /// `StorageError::UnknownConversation` if the user has no conversation.
    pub async fn save(&self, user_id: &UserId) -> Result<(), StorageError> {
        let Some(shared) = self.get(user_id).await else {
            tracing::error!(user = %user_id, "Unknown conversation id, unable to persist");
            return Err(StorageError::UnknownConversation(user_id.clone()));
        };

        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let conversation = shared.lock().await;
        storage.save_conversation(&conversation, user_id).await
    }

    /// Drops the user's conversation from memory.
    pub async fn remove(&self, user_id: &UserId) -> Option<SharedConversation> {
        self.conversations.write().await.remove(user_id)
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}
