//! Adapters - Implementations of port interfaces.
//!
//! Following hexagonal architecture, adapters implement the ports
//! defined in the ports module, connecting the pipeline to concrete
//! engines, spell checkers, storage and log sinks.

pub mod engine;
pub mod logging;
pub mod spelling;
pub mod storage;
pub mod text;

use std::sync::Arc;

use crate::application::{BotComponents, SelectorFactory};
use crate::config::AppConfig;

/// The built-in components for [`crate::application::Bot::from_config`]:
/// `table` engines, the `dictionary` spell checker, configured storage,
/// punctuation splitting and tracing conversation log.
pub fn builtin_components(config: &AppConfig) -> BotComponents {
    BotComponents {
        engines: engine::builtin_engine_factory(),
        selectors: SelectorFactory::with_builtins(),
        spell_checkers: spelling::builtin_spell_checker_factory(),
        storage: storage::storage_from_config(&config.conversations),
        splitter: Arc::new(text::PunctuationSplitter::default()),
        conversation_log: Arc::new(logging::TracingConversationLog),
    }
}
