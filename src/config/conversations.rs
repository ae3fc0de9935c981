//! Conversation storage configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::dialog::DEFAULT_MAX_HISTORIES;

/// Where conversations are persisted and how they are restored
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationsConfig {
    /// Storage backend; none keeps conversations in process only
    pub storage: Option<StorageKind>,

    /// Directory for file storage
    pub path: Option<String>,

    /// Serialization format for file storage
    #[serde(default)]
    pub format: StorageFormat,

    /// Wipe stored conversations when the bot starts
    #[serde(default)]
    pub empty_on_start: bool,

    /// Keep the stored topic instead of resetting it on load
    #[serde(default)]
    pub restore_last_topic: bool,

    /// Top-level questions retained per conversation
    #[serde(default = "default_max_histories")]
    pub max_histories: usize,
}

/// Conversation storage backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    File,
}

/// On-disk conversation format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Yaml,
    Json,
}

impl StorageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Yaml => "yaml",
            StorageFormat::Json => "json",
        }
    }
}

impl ConversationsConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_histories == 0 {
            return Err(ValidationError::InvalidMaxHistories);
        }
        if self.storage == Some(StorageKind::File)
            && self.path.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            return Err(ValidationError::MissingRequired("conversations.path"));
        }
        Ok(())
    }
}

impl Default for ConversationsConfig {
    fn default() -> Self {
        Self {
            storage: None,
            path: None,
            format: StorageFormat::default(),
            empty_on_start: false,
            restore_last_topic: false,
            max_histories: default_max_histories(),
        }
    }
}

fn default_max_histories() -> usize {
    DEFAULT_MAX_HISTORIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversations_defaults() {
        let config = ConversationsConfig::default();
        assert!(config.storage.is_none());
        assert_eq!(config.max_histories, 100);
        assert_eq!(config.format, StorageFormat::Yaml);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_storage_requires_path() {
        let config = ConversationsConfig {
            storage: Some(StorageKind::File),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("conversations.path"))
        ));
    }

    #[test]
    fn test_zero_histories_is_invalid() {
        let config = ConversationsConfig {
            max_histories: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidMaxHistories)));
    }

    #[test]
    fn test_storage_kind_deserialization() {
        let json = r#"{ "storage": "file", "path": "/tmp/convos", "format": "json" }"#;
        let config: ConversationsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.storage, Some(StorageKind::File));
        assert_eq!(config.format.extension(), "json");
        assert!(config.validate().is_ok());
    }
}
