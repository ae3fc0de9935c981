//! File-based Conversation Storage Adapter
//!
//! Stores one file per user, as YAML (default) or JSON, in a single
//! directory. File names encode the user id one-to-one: lowercase ASCII
//! letters, digits and `-` are kept, every other byte becomes `_` followed
//! by two hex digits. Distinct ids never share a file, even on
//! case-insensitive file systems.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::StorageFormat;
use crate::domain::dialog::Conversation;
use crate::domain::foundation::UserId;
use crate::ports::{ConversationStorage, StorageError};

fn encode_file_stem(user_id: &UserId) -> String {
    let mut stem = String::with_capacity(user_id.as_str().len());
    for byte in user_id.as_str().bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

/// File-based storage for conversations
#[derive(Debug, Clone)]
pub struct FileConversationStorage {
    base_path: PathBuf,
    format: StorageFormat,
}

impl FileConversationStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileConversationStorage::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            format: StorageFormat::default(),
        }
    }

    pub fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = format;
        self
    }

    /// Get the conversation file path for a user
    fn conversation_file_path(&self, user_id: &UserId) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", encode_file_stem(user_id), self.format.extension()))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn serialize(&self, conversation: &Conversation) -> Result<String, StorageError> {
        match self.format {
            StorageFormat::Yaml => serde_yaml::to_string(conversation)
                .map_err(|e| StorageError::SerializationFailed(e.to_string())),
            StorageFormat::Json => serde_json::to_string_pretty(conversation)
                .map_err(|e| StorageError::SerializationFailed(e.to_string())),
        }
    }

    fn deserialize(&self, text: &str) -> Result<Conversation, StorageError> {
        match self.format {
            StorageFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| StorageError::DeserializationFailed(e.to_string())),
            StorageFormat::Json => serde_json::from_str(text)
                .map_err(|e| StorageError::DeserializationFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl ConversationStorage for FileConversationStorage {
    async fn empty(&self) -> Result<(), StorageError> {
        if !self.base_path.exists() {
            return Ok(());
        }

        let extension = self.format.extension();
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| StorageError::IoError(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn load_conversation(
        &self,
        conversation: &mut Conversation,
        user_id: &UserId,
        restore_last_topic: bool,
    ) -> Result<bool, StorageError> {
        let file_path = self.conversation_file_path(user_id);

        // Nothing stored yet for this user
        if !file_path.exists() {
            return Ok(false);
        }

        let text = fs::read_to_string(&file_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let stored = self.deserialize(&text)?;
        if stored.user_id() != user_id {
            return Err(StorageError::DeserializationFailed(format!(
                "{} holds the conversation of [{}], not [{}]",
                file_path.display(),
                stored.user_id(),
                user_id
            )));
        }
        conversation.restore_from(stored, restore_last_topic);
        Ok(true)
    }

    async fn save_conversation(
        &self,
        conversation: &Conversation,
        user_id: &UserId,
    ) -> Result<(), StorageError> {
        self.ensure_dir().await?;

        let text = self.serialize(conversation)?;

        fs::write(self.conversation_file_path(user_id), text)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(())
    }
}
