//! Conversation Storage Port - Interface for persisting conversations.
//!
//! This port defines how a user's conversation is saved and restored,
//! supporting both file-based and in-memory storage.

use async_trait::async_trait;

use crate::domain::dialog::Conversation;
use crate::domain::foundation::UserId;

/// Errors that can occur during conversation storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unknown conversation id [{0}], unable to persist")]
    UnknownConversation(UserId),

    #[error("Failed to serialize conversation: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize conversation: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading conversations
#[async_trait]
pub trait ConversationStorage: Send + Sync {
    /// Remove every stored conversation
    async fn empty(&self) -> Result<(), StorageError>;

    /// Load the stored conversation for `user_id` into `conversation`
    ///
    /// # Returns
    /// `true` if stored state was found and merged, `false` if there was
    /// nothing stored for this user (the conversation is left untouched)
    ///
    /// # Errors
    /// Returns `StorageError` if stored state exists but cannot be read
    async fn load_conversation(
        &self,
        conversation: &mut Conversation,
        user_id: &UserId,
        restore_last_topic: bool,
    ) -> Result<bool, StorageError>;

    /// Save `conversation` under `user_id`, replacing earlier state
    async fn save_conversation(
        &self,
        conversation: &Conversation,
        user_id: &UserId,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_conversation_names_the_user() {
        let err = StorageError::UnknownConversation(UserId::new("ghost").unwrap());
        assert!(err.to_string().contains("ghost"));
        assert!(err.to_string().contains("unable to persist"));
    }

    #[test]
    fn io_error_displays_message() {
        let err = StorageError::IoError("disk full".to_string());
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
