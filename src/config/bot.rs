//! Bot pipeline configuration

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::dialog::GuardLimits;

/// Responses, redirects and guard limits for the question pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Literal answer when nothing matched
    #[serde(default = "default_default_response")]
    pub default_response: String,

    /// Input resolved as a sub-query to produce the default answer
    pub default_response_srai: Option<String>,

    /// Literal greeting used when no initial redirect is configured
    #[serde(default = "default_initial_question")]
    pub initial_question: String,

    /// Input resolved to produce the greeting
    pub initial_question_srai: Option<String>,

    /// Literal farewell
    #[serde(default = "default_exit_response")]
    pub exit_response: String,

    /// Input resolved to produce the farewell
    pub exit_response_srai: Option<String>,

    /// Substituted for blank user input
    #[serde(default = "default_empty_string")]
    pub empty_string: String,

    /// Maximum redirect depth; negative disables the check
    #[serde(default = "default_max_question_recursion")]
    pub max_question_recursion: i64,

    /// Maximum seconds per top-level question; negative disables the check
    #[serde(default = "default_max_question_timeout")]
    pub max_question_timeout_secs: i64,

    /// Registered name of the engine selector (`fifo` when unset)
    pub brain_selector: Option<String>,

    /// Overrides engine properties in the version string
    #[serde(default)]
    pub override_properties: HashMap<String, String>,
}

impl BotConfig {
    /// Guard limits derived from the recursion and timeout settings
    pub fn limits(&self) -> GuardLimits {
        let max_depth = u32::try_from(self.max_question_recursion).ok();
        let max_elapsed = u64::try_from(self.max_question_timeout_secs)
            .ok()
            .map(Duration::from_secs);
        GuardLimits::new(max_depth, max_elapsed)
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_response.trim().is_empty() {
            return Err(ValidationError::MissingRequired("bot.default_response"));
        }
        if self.max_question_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_response: default_default_response(),
            default_response_srai: None,
            initial_question: default_initial_question(),
            initial_question_srai: None,
            exit_response: default_exit_response(),
            exit_response_srai: None,
            empty_string: default_empty_string(),
            max_question_recursion: default_max_question_recursion(),
            max_question_timeout_secs: default_max_question_timeout(),
            brain_selector: None,
            override_properties: HashMap::new(),
        }
    }
}

fn default_default_response() -> String {
    "Sorry, I don't have an answer for that!".to_string()
}

fn default_initial_question() -> String {
    "Hello".to_string()
}

fn default_exit_response() -> String {
    "So long, and thanks for the fish!".to_string()
}

fn default_empty_string() -> String {
    "YEMPTY".to_string()
}

fn default_max_question_recursion() -> i64 {
    100
}

fn default_max_question_timeout() -> i64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_config_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.default_response, "Sorry, I don't have an answer for that!");
        assert_eq!(config.initial_question, "Hello");
        assert_eq!(config.empty_string, "YEMPTY");
        assert_eq!(config.max_question_recursion, 100);
        assert_eq!(config.max_question_timeout_secs, 60);
        assert!(config.default_response_srai.is_none());
    }

    #[test]
    fn test_limits_from_defaults() {
        let limits = BotConfig::default().limits();
        assert_eq!(limits.max_depth(), Some(100));
        assert_eq!(limits.max_elapsed(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_negative_values_disable_guards() {
        let config = BotConfig {
            max_question_recursion: -1,
            max_question_timeout_secs: -1,
            ..Default::default()
        };
        assert_eq!(config.limits(), GuardLimits::unlimited());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = BotConfig {
            max_question_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn test_blank_default_response_is_invalid() {
        let config = BotConfig {
            default_response: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{ "default_response_srai": "DEFAULT FALLBACK", "max_question_recursion": 3 }"#;
        let config: BotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_response_srai.as_deref(), Some("DEFAULT FALLBACK"));
        assert_eq!(config.max_question_recursion, 3);
        assert_eq!(config.exit_response, "So long, and thanks for the fish!");
    }
}
