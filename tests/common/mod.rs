//! Shared builders for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chatbot_core::adapters::engine::TableEngine;
use chatbot_core::adapters::logging::TracingConversationLog;
use chatbot_core::adapters::text::PunctuationSplitter;
use chatbot_core::application::{Bot, EngineRegistry, RequestContext};
use chatbot_core::config::{BotConfig, EngineConfig};
use chatbot_core::domain::foundation::UserId;
use chatbot_core::ports::{ConversationLog, KnowledgeEngine};

pub const DEFAULT_RESPONSE: &str = "Sorry, I don't have an answer for that!";

/// A table engine answering greetings, with `HI` redirecting to `HELLO`.
pub fn greeting_engine() -> Arc<dyn KnowledgeEngine> {
    let config = EngineConfig::new("greetings")
        .with_pattern("HELLO", "Hi")
        .with_pattern("HI", "srai:HELLO")
        .with_pattern("HOW ARE YOU", "Fine")
        .with_pattern("YDEFAULT", "I don't follow")
        .with_pattern("YINITIAL", "Welcome!")
        .with_pattern("YEXIT", "See you");
    Arc::new(TableEngine::from_config(&config).unwrap())
}

pub fn bot_with(engines: Vec<Arc<dyn KnowledgeEngine>>, config: BotConfig) -> Bot {
    bot_with_log(engines, config, Arc::new(TracingConversationLog))
}

pub fn bot_with_log(
    engines: Vec<Arc<dyn KnowledgeEngine>>,
    config: BotConfig,
    log: Arc<dyn ConversationLog>,
) -> Bot {
    let mut registry = EngineRegistry::new();
    for engine in engines {
        registry.register(engine).unwrap();
    }
    Bot::new(config, registry, Arc::new(PunctuationSplitter::default()), log)
}

pub fn greeting_bot() -> Bot {
    bot_with(vec![greeting_engine()], BotConfig::default())
}

pub fn context(user: &str) -> RequestContext {
    RequestContext::new(UserId::new(user).unwrap())
}
