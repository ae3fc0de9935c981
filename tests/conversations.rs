//! Integration tests for per-user conversations and configuration wiring.
//!
//! Bots here are built through `Bot::from_config` with the built-in
//! components, so engines, selectors and storage come from configuration.

mod common;

use std::sync::Arc;

use chatbot_core::adapters::builtin_components;
use chatbot_core::application::{Bot, BotError};
use chatbot_core::config::{AppConfig, EngineConfig, StorageKind, ValidationError};
use chatbot_core::domain::foundation::UserId;
use chatbot_core::ports::StorageError;
use tempfile::TempDir;

use common::{context, greeting_bot};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn two_engine_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.brains = vec![
        EngineConfig::new("first").with_pattern("WHO ARE YOU", "first"),
        EngineConfig::new("second").with_pattern("WHO ARE YOU", "second"),
    ];
    config
}

fn file_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.conversations.storage = Some(StorageKind::File);
    config.conversations.path = Some(dir.path().to_string_lossy().into_owned());
    config
}

async fn build(config: &AppConfig) -> Bot {
    Bot::from_config(config, builtin_components(config))
        .await
        .unwrap()
}

// =============================================================================
// Conversation Identity
// =============================================================================

#[tokio::test]
async fn same_user_gets_same_conversation() {
    let bot = greeting_bot();
    let ctx = context("ada");

    let first = bot.conversation(&ctx).await.unwrap();
    let second = bot.conversation(&ctx).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(bot.has_conversation(&ctx).await);
}

#[tokio::test]
async fn users_get_separate_conversations() {
    let bot = greeting_bot();
    let mut ada = context("ada");
    let mut grace = context("grace");

    bot.ask_question(&mut ada, "hello").await.unwrap();
    bot.ask_question(&mut ada, "hi").await.unwrap();
    bot.ask_question(&mut grace, "hello").await.unwrap();

    let ada_conversation = bot.conversation(&ada).await.unwrap();
    let grace_conversation = bot.conversation(&grace).await.unwrap();
    assert!(!Arc::ptr_eq(&ada_conversation, &grace_conversation));
    assert_eq!(ada_conversation.lock().await.len(), 2);
    assert_eq!(grace_conversation.lock().await.len(), 1);
    assert_eq!(bot.conversations().len().await, 2);
}

#[tokio::test]
async fn history_is_capped_at_max_histories() {
    let mut config = AppConfig::default();
    config.conversations.max_histories = 2;
    let bot = build(&config).await;
    let mut ctx = context("ada");

    for text in ["hello", "hi", "bye"] {
        bot.ask_question(&mut ctx, text).await.unwrap();
    }

    let shared = bot.conversation(&ctx).await.unwrap();
    let conversation = shared.lock().await;
    let texts: Vec<&str> = conversation.history().iter().map(|q| q.text()).collect();
    assert_eq!(texts, vec!["hi", "bye"]);
}

// =============================================================================
// Storage
// =============================================================================

#[tokio::test]
async fn file_storage_restores_conversation_in_new_bot() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let user = UserId::new("ada").unwrap();

    let bot = build(&config).await;
    let mut ctx = context("ada");
    bot.ask_question(&mut ctx, "hello").await.unwrap();
    bot.save_conversation(&user).await.unwrap();

    let restarted = build(&config).await;
    let shared = restarted.conversation(&context("ada")).await.unwrap();
    let conversation = shared.lock().await;
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation.history()[0].text(), "hello");
}

#[tokio::test]
async fn empty_on_start_discards_stored_conversations() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);
    let user = UserId::new("ada").unwrap();

    let bot = build(&config).await;
    bot.ask_question(&mut context("ada"), "hello").await.unwrap();
    bot.save_conversation(&user).await.unwrap();

    config.conversations.empty_on_start = true;
    let restarted = build(&config).await;
    let shared = restarted.conversation(&context("ada")).await.unwrap();
    assert!(shared.lock().await.is_empty());
}

#[tokio::test]
async fn saving_unknown_user_is_an_error() {
    let mut config = AppConfig::default();
    config.conversations.storage = Some(StorageKind::Memory);
    let bot = build(&config).await;
    let stranger = UserId::new("stranger").unwrap();

    let err = bot.save_conversation(&stranger).await.unwrap_err();

    assert!(matches!(err, StorageError::UnknownConversation(_)));
}

// =============================================================================
// Configuration Wiring
// =============================================================================

#[tokio::test]
async fn default_configuration_answers_greetings() {
    let bot = build(&AppConfig::default()).await;
    let mut ctx = context("ada");

    assert_eq!(bot.initial_question(&mut ctx).await.unwrap(), "Hello");
    assert_eq!(bot.ask_question(&mut ctx, "Hi!").await.unwrap(), "Hi there!");
    assert_eq!(bot.ask_question(&mut ctx, "bye").await.unwrap(), "Goodbye!");
}

#[tokio::test]
async fn first_registered_engine_answers() {
    let bot = build(&two_engine_config()).await;

    let answer = bot.ask_question(&mut context("ada"), "who are you").await.unwrap();

    assert_eq!(answer, "first");
    assert_eq!(bot.engine_ids(), vec!["first", "second"]);
    assert_eq!(bot.engine("second").map(|e| e.id().to_string()), Some("second".to_string()));
    assert!(bot.engine("third").is_none());
}

#[tokio::test]
async fn unknown_selector_falls_back_to_first_engine() {
    let mut config = two_engine_config();
    config.bot.brain_selector = Some("no-such-selector".to_string());
    let bot = build(&config).await;

    let answer = bot.ask_question(&mut context("ada"), "who are you").await.unwrap();

    assert_eq!(bot.engines().selector_name(), "fifo");
    assert_eq!(answer, "first");
}

#[tokio::test]
async fn round_robin_selector_rotates_engines() {
    let mut config = two_engine_config();
    config.bot.brain_selector = Some("round_robin".to_string());
    let bot = build(&config).await;
    let mut ctx = context("ada");

    let first = bot.ask_question(&mut ctx, "who are you").await.unwrap();
    let second = bot.ask_question(&mut ctx, "who are you").await.unwrap();

    assert_ne!(first, second);
}

#[tokio::test]
async fn lookups_before_a_question_leave_the_rotation_alone() {
    let mut config = two_engine_config();
    config.bot.brain_selector = Some("round_robin".to_string());
    let bot = build(&config).await;
    let mut ctx = context("ada");

    bot.conversation(&ctx).await.unwrap();
    bot.version_string(&ctx).await.unwrap();
    let first = bot.ask_question(&mut ctx, "who are you").await.unwrap();
    let second = bot.ask_question(&mut ctx, "who are you").await.unwrap();

    assert_eq!(first, "first");
    assert_eq!(second, "second");
}

#[tokio::test]
async fn configured_spell_checker_retries() {
    let mut config = AppConfig::default();
    config.spelling.classname = Some("dictionary".to_string());
    config.spelling.check_and_retry = true;
    config
        .spelling
        .corrections
        .insert("helo".to_string(), "hello".to_string());
    let bot = build(&config).await;

    let answer = bot.ask_question(&mut context("ada"), "helo").await.unwrap();

    assert_eq!(answer, "Hi there!");
}

#[tokio::test]
async fn no_brains_is_rejected() {
    let mut config = AppConfig::default();
    config.brains.clear();

    let result = Bot::from_config(&config, builtin_components(&config)).await;

    assert!(matches!(
        result,
        Err(BotError::Config(ValidationError::NoBrainsConfigured))
    ));
}
