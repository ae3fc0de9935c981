//! Bot - the question-answering pipeline.
//!
//! `ask_question` turns raw user text into one combined answer:
//!
//! 1. Bind an engine (top level only) and start the request clock
//! 2. Pre-process, split into sentences and record the question
//! 3. Answer each sentence in order, checking the recursion and time
//!    guards before every dispatch
//! 4. Retry unmatched sentences after spelling correction, then fall back
//!    to the default response
//! 5. Tear down (pop sub-query questions, release the conversation) and
//!    join the answers
//!
//! Engines resolve redirects by calling back into the pipeline through
//! [`SubQueryResolver`], which `Bot` implements. A sub-query shares its
//! parent's depth counter and clock, so a redirect loop trips the guard and
//! aborts the whole top-level call.
//!
//! # Concurrency
//!
//! A top-level call holds the lock on its user's conversation until it
//! returns. Concurrent calls for the same user therefore run one after the
//! other; calls for different users proceed in parallel.

use futures::future::BoxFuture;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, BotConfig};
use crate::domain::dialog::{combine_answers, GuardLimits, Question, Sentence};
use crate::domain::foundation::UserId;
use crate::ports::{
    ConversationLog, ConversationStorage, KnowledgeEngine, ResponseLogger, SentenceSplitter,
    SpellChecker, StorageError, SubQueryResolver,
};

use super::brain::{EngineFactory, EngineRegistry, SelectorFactory};
use super::conversations::{ConversationManager, SharedConversation};
use super::spelling::{SpellCheckerFactory, SpellingOptions};
use super::{BotError, PipelineError, RequestContext};

/// How a pipeline call relates to the call that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    /// A user question: binds the engine, resets the guards, splits text.
    TopLevel,
    /// An engine redirect: one level deeper, unmatched text gets the
    /// default response.
    SubQuery,
    /// A configured redirect (default, initial or exit response): one level
    /// deeper, unmatched text yields nothing so the caller can use its
    /// literal.
    Fallback,
    /// A spelling retry: same depth as its parent, unmatched text yields
    /// nothing.
    Retry,
}

impl CallKind {
    fn is_top_level(self) -> bool {
        self == CallKind::TopLevel
    }

    fn counts_depth(self) -> bool {
        matches!(self, CallKind::SubQuery | CallKind::Fallback)
    }

    fn is_redirect(self) -> bool {
        matches!(self, CallKind::SubQuery | CallKind::Fallback)
    }

    fn defaults_on_no_match(self) -> bool {
        matches!(self, CallKind::TopLevel | CallKind::SubQuery)
    }
}

/// Context changes made when a call starts that must be undone at teardown.
#[derive(Debug, Default, Clone, Copy)]
struct Opened {
    conversation: bool,
    question: bool,
}

/// Pluggable pieces used by [`Bot::from_config`].
pub struct BotComponents {
    pub engines: EngineFactory,
    pub selectors: SelectorFactory,
    pub spell_checkers: SpellCheckerFactory,
    pub storage: Option<Arc<dyn ConversationStorage>>,
    pub splitter: Arc<dyn SentenceSplitter>,
    pub conversation_log: Arc<dyn ConversationLog>,
}

/// The question-answering pipeline.
pub struct Bot {
    config: BotConfig,
    limits: GuardLimits,
    engines: EngineRegistry,
    conversations: ConversationManager,
    splitter: Arc<dyn SentenceSplitter>,
    spell_checker: Option<Arc<dyn SpellChecker>>,
    spelling: SpellingOptions,
    conversation_log: Arc<dyn ConversationLog>,
}

impl Bot {
    pub fn new(
        config: BotConfig,
        engines: EngineRegistry,
        splitter: Arc<dyn SentenceSplitter>,
        conversation_log: Arc<dyn ConversationLog>,
    ) -> Self {
        Self {
            limits: config.limits(),
            config,
            engines,
            conversations: ConversationManager::default(),
            splitter,
            spell_checker: None,
            spelling: SpellingOptions::default(),
            conversation_log,
        }
    }

    /// Builds a bot from configuration.
    ///
    /// # Errors
    ///
    /// Invalid configuration, any engine failing to build, or storage
    /// failing to empty on start. An unusable selector or spell checker is
    /// logged and skipped instead.
    pub async fn from_config(config: &AppConfig, components: BotComponents) -> Result<Self, BotError> {
        config.validate()?;

        let selector = components
            .selectors
            .create_or_default(config.bot.brain_selector.as_deref());
        let engines =
            EngineRegistry::load_engines(&config.brains, &components.engines)?.with_selector(selector);

        let mut conversations = ConversationManager::new(config.conversations.max_histories);
        if let Some(storage) = components.storage {
            conversations =
                conversations.with_storage(storage, config.conversations.restore_last_topic);
        }
        conversations
            .initialise(config.conversations.empty_on_start)
            .await?;

        let mut bot = Self::new(
            config.bot.clone(),
            engines,
            components.splitter,
            components.conversation_log,
        )
        .with_conversations(conversations);

        if let Some(checker) = components.spell_checkers.create(&config.spelling) {
            bot = bot.with_spell_checker(checker, SpellingOptions::from(&config.spelling));
        }

        tracing::info!(
            engines = ?bot.engines.engine_ids(),
            selector = bot.engines.selector_name(),
            "Bot ready"
        );
        Ok(bot)
    }

    pub fn with_conversations(mut self, conversations: ConversationManager) -> Self {
        self.conversations = conversations;
        self
    }

    pub fn with_spell_checker(mut self, checker: Arc<dyn SpellChecker>, options: SpellingOptions) -> Self {
        self.spell_checker = Some(checker);
        self.spelling = options;
        self
    }

    pub fn with_limits(mut self, limits: GuardLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn limits(&self) -> GuardLimits {
        self.limits
    }

    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    pub fn conversations(&self) -> &ConversationManager {
        &self.conversations
    }

    /// Ids of the registered engines, in registration order.
    pub fn engine_ids(&self) -> Vec<&str> {
        self.engines.engine_ids()
    }

    pub fn engine(&self, id: &str) -> Option<Arc<dyn KnowledgeEngine>> {
        self.engines.engine(id)
    }

    // === Entry points ===

    /// Answers a user question.
    ///
    /// Always yields text when nothing matches. Fails only on a guard
    /// violation, a missing engine or an engine error.
    pub async fn ask_question(&self, ctx: &mut RequestContext, text: &str) -> Result<String, PipelineError> {
        self.ask(ctx, text, CallKind::TopLevel, None).await
    }

    /// Like [`Bot::ask_question`], reporting each answered and unanswered
    /// sentence to `logger`.
    pub async fn ask_question_with_logger(
        &self,
        ctx: &mut RequestContext,
        text: &str,
        logger: &dyn ResponseLogger,
    ) -> Result<String, PipelineError> {
        self.ask(ctx, text, CallKind::TopLevel, Some(logger)).await
    }

    /// Greeting shown when a client connects.
    pub async fn initial_question(&self, ctx: &mut RequestContext) -> Result<String, PipelineError> {
        self.redirect_or_literal(
            ctx,
            self.config.initial_question_srai.as_deref(),
            &self.config.initial_question,
        )
        .await
    }

    /// Farewell shown when a client disconnects.
    pub async fn exit_response(&self, ctx: &mut RequestContext) -> Result<String, PipelineError> {
        self.redirect_or_literal(
            ctx,
            self.config.exit_response_srai.as_deref(),
            &self.config.exit_response,
        )
        .await
    }

    /// Answer used when nothing matched.
    ///
    /// Resolves the configured default redirect when there is one, falling
    /// back to the literal default response. While the redirect itself is
    /// being resolved, nested misses use the literal directly.
    pub async fn default_response(&self, ctx: &mut RequestContext) -> Result<String, PipelineError> {
        if ctx.is_resolving_fallback() {
            return Ok(self.config.default_response.clone());
        }

        let previous = ctx.set_resolving_fallback(true);
        let resolved = self
            .redirect_or_literal(
                ctx,
                self.config.default_response_srai.as_deref(),
                &self.config.default_response,
            )
            .await;
        ctx.set_resolving_fallback(previous);
        resolved
    }

    /// "{name}, v{version}, initiated {birthdate}" from engine properties.
    ///
    /// Engines without a `version` property report `app_version` and
    /// `grammar_version` instead. Configured overrides win.
    pub async fn version_string(&self, ctx: &RequestContext) -> Result<String, PipelineError> {
        let engine = self.engine_for(ctx)?;

        let property = |name: &str| -> String {
            self.config
                .override_properties
                .get(name)
                .cloned()
                .or_else(|| engine.property(name))
                .unwrap_or_else(|| "unknown".to_string())
        };

        let has_version = self.config.override_properties.contains_key("version")
            || engine.property("version").is_some();

        if has_version {
            Ok(format!(
                "{}, v{}, initiated {}",
                property("name"),
                property("version"),
                property("birthdate")
            ))
        } else {
            Ok(format!(
                "{}, App: v{} Grammar v{}, initiated {}",
                property("name"),
                property("app_version"),
                property("grammar_version"),
                property("birthdate")
            ))
        }
    }

    // === Conversations ===

    /// The user's conversation, created and restored on first use.
    ///
    /// Do not hold its lock across a call to [`Bot::ask_question`] for the
    /// same user; the call waits for that lock.
    pub async fn conversation(&self, ctx: &RequestContext) -> Result<SharedConversation, PipelineError> {
        if let Some(existing) = self.conversations.get(ctx.user_id()).await {
            tracing::debug!(user = %ctx.user_id(), "Retrieved existing conversation");
            return Ok(existing);
        }

        let variables = self.engine_for(ctx)?.variables();
        Ok(self
            .conversations
            .get_or_create(ctx.user_id(), &variables)
            .await)
    }

    /// The bound engine, or the one the next question would be given.
    fn engine_for(&self, ctx: &RequestContext) -> Result<Arc<dyn KnowledgeEngine>, PipelineError> {
        match ctx.engine() {
            Ok(engine) => Ok(engine.clone()),
            Err(_) => self
                .engines
                .peek_engine()
                .ok_or(PipelineError::NoEngineAvailable),
        }
    }

    pub async fn has_conversation(&self, ctx: &RequestContext) -> bool {
        self.conversations.contains(ctx.user_id()).await
    }

    /// Persists the user's conversation.
    ///
    /// Saving a user that never spoke is reported as an error; the bot keeps
    /// working either way.
    pub async fn save_conversation(&self, user_id: &UserId) -> Result<(), StorageError> {
        self.conversations.save(user_id).await
    }

    // === Pipeline ===

    fn ask<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        text: &'a str,
        kind: CallKind,
        logger: Option<&'a dyn ResponseLogger>,
    ) -> BoxFuture<'a, Result<String, PipelineError>> {
        Box::pin(async move {
            let opened = self.open(ctx, kind).await?;
            let outcome = self.run(ctx, text, kind, logger).await;
            if let Ok(response) = &outcome {
                self.conversation_log
                    .log_question_and_response(ctx, text, response);
            }
            self.close(ctx, kind, opened);
            outcome
        })
    }

    async fn open(&self, ctx: &mut RequestContext, kind: CallKind) -> Result<Opened, PipelineError> {
        if kind.is_top_level() || !ctx.is_engine_bound() {
            let engine = self
                .engines
                .select_engine()
                .ok_or(PipelineError::NoEngineAvailable)?;
            tracing::debug!("Selected engine [{}] for {}", engine.id(), ctx.user_id());
            ctx.bind_engine(engine);
        }

        let mut opened = Opened::default();
        if !ctx.has_conversation() {
            let shared = self.conversation(ctx).await?;
            ctx.attach_conversation(shared.lock_owned().await);
            opened.conversation = true;
        }

        if kind.is_top_level() {
            ctx.begin_question();
        } else if !ctx.is_active() {
            ctx.begin_question();
            opened.question = true;
        }

        if kind.counts_depth() {
            ctx.enter_sub_query();
        }
        Ok(opened)
    }

    fn close(&self, ctx: &mut RequestContext, kind: CallKind, opened: Opened) {
        if kind.is_top_level() || opened.question {
            ctx.end_question();
        } else if kind.counts_depth() {
            ctx.leave_sub_query();
        }

        if opened.conversation {
            drop(ctx.detach_conversation());
        }
    }

    async fn run(
        &self,
        ctx: &mut RequestContext,
        text: &str,
        kind: CallKind,
        logger: Option<&dyn ResponseLogger>,
    ) -> Result<String, PipelineError> {
        let pre_processed = self.pre_process(ctx, text, kind).await?;

        let question = if kind.is_top_level() {
            let sentences = self.splitter.split(&pre_processed);
            Question::from_sentences(pre_processed, sentences, false)
        } else {
            Question::unsplit(pre_processed, true)
        };
        let index = ctx.conversation_mut()?.record_question(question);

        let answers = self.process_sentences(ctx, index, kind, logger).await;

        if !kind.is_top_level() {
            ctx.conversation_mut()?.pop_question();
        }

        Ok(combine_answers(&answers?))
    }

    async fn pre_process(
        &self,
        ctx: &RequestContext,
        text: &str,
        kind: CallKind,
    ) -> Result<String, PipelineError> {
        let pre_processed = if kind.is_top_level() {
            let processed = ctx.engine()?.pre_process(ctx, text).await;
            tracing::debug!("Pre Processed ({}): {}", ctx.user_id(), processed);
            processed
        } else {
            text.to_string()
        };

        if pre_processed.trim().is_empty() {
            Ok(self.config.empty_string.clone())
        } else {
            Ok(pre_processed)
        }
    }

    async fn process_sentences(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        kind: CallKind,
        logger: Option<&dyn ResponseLogger>,
    ) -> Result<Vec<Option<String>>, PipelineError> {
        let count = question(ctx, index)?.sentence_count();
        let mut answers = Vec::with_capacity(count);

        for sentence_no in 0..count {
            question_mut(ctx, index)?.set_current_sentence_no(sentence_no)?;
            let answer = self
                .process_sentence(ctx, index, sentence_no, kind, logger)
                .await?;
            answers.push(answer);
        }

        Ok(answers)
    }

    async fn process_sentence(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        sentence_no: usize,
        kind: CallKind,
        logger: Option<&dyn ResponseLogger>,
    ) -> Result<Option<String>, PipelineError> {
        if let Err(violation) = ctx.check_guards(&self.limits) {
            tracing::warn!(
                user = %ctx.user_id(),
                depth = ctx.depth(),
                "Question aborted: {}",
                violation
            );
            return Err(violation.into());
        }

        if kind.is_top_level() {
            self.check_spelling_before(ctx, index, sentence_no).await?;
        }

        let engine = ctx.engine()?.clone();
        let text = sentence(ctx, index, sentence_no)?.text().to_string();
        let mut response = engine
            .answer(self, ctx, &text, kind.is_redirect())
            .await?
            .filter(|answer| !answer.trim().is_empty());

        if response.is_none() && kind.is_top_level() {
            response = self.check_spelling_and_retry(ctx, index, sentence_no).await?;
        }

        match response {
            Some(raw) => self
                .handle_response(ctx, index, sentence_no, raw, kind, logger)
                .await
                .map(Some),
            None if kind.defaults_on_no_match() => self
                .handle_none_response(ctx, index, sentence_no, logger)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    async fn check_spelling_before(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        sentence_no: usize,
    ) -> Result<(), PipelineError> {
        let Some(checker) = self.spell_checker.as_ref().filter(|_| self.spelling.check_before) else {
            return Ok(());
        };

        let text = sentence(ctx, index, sentence_no)?.text().to_string();
        let corrected = checker.correct(&text).await;
        tracing::debug!("Spell Checker corrected [{}] to [{}]", text, corrected);
        sentence_mut(ctx, index, sentence_no)?.replace_text(corrected);
        Ok(())
    }

    /// Corrects an unmatched sentence and answers it again.
    async fn check_spelling_and_retry(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        sentence_no: usize,
    ) -> Result<Option<String>, PipelineError> {
        let Some(checker) = self.spell_checker.as_ref().filter(|_| self.spelling.check_and_retry) else {
            return Ok(None);
        };

        let text = sentence(ctx, index, sentence_no)?.text().to_string();
        let corrected = checker.correct(&text).await;
        tracing::debug!("Spell Checker corrected [{}] to [{}]", text, corrected);
        sentence_mut(ctx, index, sentence_no)?.replace_text(corrected.clone());

        let answer = self.ask(ctx, &corrected, CallKind::Retry, None).await?;
        Ok(Some(answer).filter(|answer| !answer.trim().is_empty()))
    }

    async fn handle_response(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        sentence_no: usize,
        raw: String,
        kind: CallKind,
        logger: Option<&dyn ResponseLogger>,
    ) -> Result<String, PipelineError> {
        tracing::debug!("Raw Response ({}): {}", ctx.user_id(), raw);
        sentence_mut(ctx, index, sentence_no)?.set_response(raw.clone());

        let answer = if kind.is_top_level() {
            let engine = ctx.engine()?.clone();
            let processed = engine.post_process(ctx, &raw).await.trim().to_string();
            if processed.is_empty() {
                self.default_response(ctx).await?
            } else {
                processed
            }
        } else {
            raw
        };

        tracing::debug!("Processed Response ({}): {}", ctx.user_id(), answer);
        if let Some(logger) = logger {
            logger.log_response(sentence(ctx, index, sentence_no)?.text(), &answer);
        }
        Ok(answer)
    }

    async fn handle_none_response(
        &self,
        ctx: &mut RequestContext,
        index: usize,
        sentence_no: usize,
        logger: Option<&dyn ResponseLogger>,
    ) -> Result<String, PipelineError> {
        let default = self.default_response(ctx).await?;
        let user = ctx.user_id().clone();

        let sentence = sentence_mut(ctx, index, sentence_no)?;
        sentence.set_response(default.clone());
        tracing::info!("No answer for [{}] from {}, using default response", sentence.text(), user);

        if let Some(logger) = logger {
            logger.log_unknown_response(sentence);
        }
        Ok(default)
    }

    async fn redirect_or_literal(
        &self,
        ctx: &mut RequestContext,
        redirect: Option<&str>,
        literal: &str,
    ) -> Result<String, PipelineError> {
        let Some(redirect) = redirect.filter(|target| !target.trim().is_empty()) else {
            return Ok(literal.to_string());
        };

        let resolved = self.ask(ctx, redirect, CallKind::Fallback, None).await?;
        if resolved.trim().is_empty() {
            Ok(literal.to_string())
        } else {
            Ok(resolved)
        }
    }
}

#[async_trait]
impl SubQueryResolver for Bot {
    async fn resolve(&self, ctx: &mut RequestContext, text: &str) -> Result<String, PipelineError> {
        self.ask(ctx, text, CallKind::SubQuery, None).await
    }
}

fn question(ctx: &RequestContext, index: usize) -> Result<&Question, PipelineError> {
    ctx.conversation()?
        .question(index)
        .ok_or_else(|| missing_question(index))
}

fn question_mut(ctx: &mut RequestContext, index: usize) -> Result<&mut Question, PipelineError> {
    ctx.conversation_mut()?
        .question_mut(index)
        .ok_or_else(|| missing_question(index))
}

fn sentence(ctx: &RequestContext, index: usize, sentence_no: usize) -> Result<&Sentence, PipelineError> {
    question(ctx, index)?
        .sentence(sentence_no)
        .ok_or_else(|| missing_sentence(sentence_no))
}

fn sentence_mut(
    ctx: &mut RequestContext,
    index: usize,
    sentence_no: usize,
) -> Result<&mut Sentence, PipelineError> {
    question_mut(ctx, index)?
        .sentence_mut(sentence_no)
        .ok_or_else(|| missing_sentence(sentence_no))
}

fn missing_question(index: usize) -> PipelineError {
    PipelineError::InvalidState(format!("question {} is no longer in the history", index))
}

fn missing_sentence(sentence_no: usize) -> PipelineError {
    PipelineError::InvalidState(format!("sentence {} does not exist", sentence_no))
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("engines", &self.engines)
            .field("limits", &self.limits)
            .field("spelling", &self.spelling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::logging::TracingConversationLog;
    use crate::adapters::text::PunctuationSplitter;
    use std::collections::HashMap;

    struct PropertyEngine(HashMap<String, String>);

    #[async_trait]
    impl KnowledgeEngine for PropertyEngine {
        fn id(&self) -> &str {
            "props"
        }

        async fn answer(
            &self,
            _resolver: &dyn SubQueryResolver,
            _ctx: &mut RequestContext,
            _sentence: &str,
            _sub_query: bool,
        ) -> Result<Option<String>, PipelineError> {
            Ok(None)
        }

        fn property(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    fn bot_with_properties(properties: &[(&str, &str)], config: BotConfig) -> Bot {
        let properties = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut engines = EngineRegistry::new();
        engines.register(Arc::new(PropertyEngine(properties))).unwrap();
        Bot::new(
            config,
            engines,
            Arc::new(PunctuationSplitter::default()),
            Arc::new(TracingConversationLog),
        )
    }

    fn context() -> RequestContext {
        RequestContext::new(UserId::new("tester").unwrap())
    }

    #[test]
    fn call_kinds_differ_in_accounting() {
        assert!(!CallKind::TopLevel.counts_depth());
        assert!(CallKind::SubQuery.counts_depth());
        assert!(CallKind::Fallback.counts_depth());
        assert!(!CallKind::Retry.counts_depth());
        assert!(CallKind::SubQuery.defaults_on_no_match());
        assert!(!CallKind::Retry.defaults_on_no_match());
        assert!(!CallKind::Fallback.defaults_on_no_match());
    }

    #[tokio::test]
    async fn version_string_uses_single_version() {
        let bot = bot_with_properties(
            &[("name", "Y-Bot"), ("version", "1.2"), ("birthdate", "May 1st")],
            BotConfig::default(),
        );
        let version = bot.version_string(&context()).await.unwrap();
        assert_eq!(version, "Y-Bot, v1.2, initiated May 1st");
    }

    #[tokio::test]
    async fn version_string_splits_app_and_grammar() {
        let bot = bot_with_properties(
            &[
                ("name", "Y-Bot"),
                ("app_version", "2.0"),
                ("grammar_version", "7"),
                ("birthdate", "today"),
            ],
            BotConfig::default(),
        );
        let version = bot.version_string(&context()).await.unwrap();
        assert_eq!(version, "Y-Bot, App: v2.0 Grammar v7, initiated today");
    }

    #[tokio::test]
    async fn version_string_honours_overrides() {
        let config = BotConfig {
            override_properties: HashMap::from([("name".to_string(), "Custom".to_string())]),
            ..Default::default()
        };
        let bot = bot_with_properties(&[("name", "Y-Bot"), ("version", "1")], config);
        let version = bot.version_string(&context()).await.unwrap();
        assert_eq!(version, "Custom, v1, initiated unknown");
    }

    #[tokio::test]
    async fn literal_entry_points_need_no_engine_call() {
        let bot = bot_with_properties(&[], BotConfig::default());
        let mut ctx = context();

        assert_eq!(bot.initial_question(&mut ctx).await.unwrap(), "Hello");
        assert_eq!(
            bot.exit_response(&mut ctx).await.unwrap(),
            "So long, and thanks for the fish!"
        );
        assert_eq!(
            bot.default_response(&mut ctx).await.unwrap(),
            "Sorry, I don't have an answer for that!"
        );
    }

    #[tokio::test]
    async fn unmatched_initial_redirect_uses_literal() {
        let config = BotConfig {
            initial_question_srai: Some("YINITIALQUESTION".to_string()),
            ..Default::default()
        };
        let bot = bot_with_properties(&[], config);
        let mut ctx = context();

        assert_eq!(bot.initial_question(&mut ctx).await.unwrap(), "Hello");
        assert!(!ctx.has_conversation());
        assert!(!ctx.is_active());
        assert!(bot.has_conversation(&ctx).await);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn count(&self, needle: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap()).matches(needle).count()
        }
    }

    #[tokio::test]
    async fn later_questions_log_retrieved_conversation() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let bot = bot_with_properties(&[], BotConfig::default());
        let mut ctx = context();
        bot.ask_question(&mut ctx, "first").await.unwrap();
        assert_eq!(logs.count("Retrieved existing conversation"), 0);

        bot.ask_question(&mut ctx, "second").await.unwrap();
        assert_eq!(logs.count("Retrieved existing conversation"), 1);
    }

    #[tokio::test]
    async fn no_engine_is_an_error() {
        let bot = Bot::new(
            BotConfig::default(),
            EngineRegistry::new(),
            Arc::new(PunctuationSplitter::default()),
            Arc::new(TracingConversationLog),
        );
        let result = bot.ask_question(&mut context(), "Hello").await;
        assert_eq!(result.err(), Some(PipelineError::NoEngineAvailable));
    }
}
