//! Application configuration module
//!
//! This module provides type-safe configuration loading using the `config`
//! and `dotenvy` crates. Values come from an optional configuration file
//! overlaid by environment variables with the `CHATBOT` prefix; nested
//! values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use chatbot_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Default response: {}", config.bot.default_response);
//! ```

mod bot;
mod conversations;
mod engine;
mod error;
mod logging;
mod spelling;

pub use bot::BotConfig;
pub use conversations::{ConversationsConfig, StorageFormat, StorageKind};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use spelling::SpellingConfig;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_FILE_ENV: &str = "CHATBOT_CONFIG";

/// Configuration file looked up when `CHATBOT_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "config/chatbot";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads the configuration file and
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Responses, redirects and guard limits
    #[serde(default)]
    pub bot: BotConfig,

    /// Spell checker selection and switches
    #[serde(default)]
    pub spelling: SpellingConfig,

    /// Conversation storage
    #[serde(default)]
    pub conversations: ConversationsConfig,

    /// Engines to register, in registration order
    #[serde(default = "engine::default_engines")]
    pub brains: Vec<EngineConfig>,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the default file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the file named by `CHATBOT_CONFIG` (or `config/chatbot.*`)
    ///    if it exists
    /// 3. Overlays environment variables with the `CHATBOT` prefix, using
    ///    `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CHATBOT__BOT__DEFAULT_RESPONSE=...` -> `bot.default_response = ...`
    /// - `CHATBOT__CONVERSATIONS__STORAGE=file` -> `conversations.storage = file`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(file)
    }

    /// Load configuration from `file` (optional) plus environment variables
    pub fn load_from(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = file.as_ref();
        let source = match file.extension() {
            Some(_) => config::File::from(file),
            None => config::File::with_name(&file.to_string_lossy()),
        };

        let config = config::Config::builder()
            .add_source(source.required(false))
            .add_source(
                config::Environment::default()
                    .prefix("CHATBOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.conversations.validate()?;
        self.validate_brains()?;
        Ok(())
    }

    fn validate_brains(&self) -> Result<(), ValidationError> {
        if self.brains.is_empty() {
            return Err(ValidationError::NoBrainsConfigured);
        }
        let mut seen = HashSet::new();
        for brain in &self.brains {
            if brain.id.trim().is_empty() {
                return Err(ValidationError::EmptyBrainId);
            }
            if !seen.insert(brain.id.as_str()) {
                return Err(ValidationError::DuplicateBrainId(brain.id.clone()));
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            spelling: SpellingConfig::default(),
            conversations: ConversationsConfig::default(),
            brains: engine::default_engines(),
            logging: LoggingConfig::default(),
        }
    }
}
