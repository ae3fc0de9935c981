//! Engine selection strategies.
//!
//! A selector picks which registered engine answers a new top-level
//! question. Selectors are constructed by name through [`SelectorFactory`];
//! an unknown or failing selector never stops the bot, it falls back to
//! [`FifoSelector`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::application::SelectorError;
use crate::ports::KnowledgeEngine;

/// Name of the selector used when none is configured.
pub const DEFAULT_SELECTOR: &str = "fifo";

/// An engine held by the registry, in registration order.
#[derive(Clone)]
pub struct RegisteredEngine {
    id: String,
    engine: Arc<dyn KnowledgeEngine>,
}

impl RegisteredEngine {
    pub fn new(engine: Arc<dyn KnowledgeEngine>) -> Self {
        Self {
            id: engine.id().to_string(),
            engine,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &Arc<dyn KnowledgeEngine> {
        &self.engine
    }
}

/// Strategy for choosing an engine.
pub trait EngineSelector: Send + Sync {
    fn name(&self) -> &str;

    /// Chooses from `engines`, which are in registration order.
    fn select(&self, engines: &[RegisteredEngine]) -> Option<Arc<dyn KnowledgeEngine>>;

    /// The engine `select` would return next, without consuming the choice.
    fn peek(&self, engines: &[RegisteredEngine]) -> Option<Arc<dyn KnowledgeEngine>> {
        engines.first().map(|entry| entry.engine.clone())
    }
}

/// Always picks the first registered engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct FifoSelector;

impl EngineSelector for FifoSelector {
    fn name(&self) -> &str {
        DEFAULT_SELECTOR
    }

    fn select(&self, engines: &[RegisteredEngine]) -> Option<Arc<dyn KnowledgeEngine>> {
        engines.first().map(|entry| entry.engine.clone())
    }
}

/// Cycles through the registered engines, one per selection.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl EngineSelector for RoundRobinSelector {
    fn name(&self) -> &str {
        "round_robin"
    }

    fn select(&self, engines: &[RegisteredEngine]) -> Option<Arc<dyn KnowledgeEngine>> {
        if engines.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % engines.len();
        engines.get(index).map(|entry| entry.engine.clone())
    }

    fn peek(&self, engines: &[RegisteredEngine]) -> Option<Arc<dyn KnowledgeEngine>> {
        if engines.is_empty() {
            return None;
        }
        let index = self.next.load(Ordering::Relaxed) % engines.len();
        engines.get(index).map(|entry| entry.engine.clone())
    }
}

/// Builds a selector.
pub type SelectorConstructor = fn() -> Result<Box<dyn EngineSelector>, SelectorError>;

static BUILTIN_SELECTORS: Lazy<HashMap<&'static str, SelectorConstructor>> = Lazy::new(|| {
    let mut builtins: HashMap<&'static str, SelectorConstructor> = HashMap::new();
    builtins.insert(DEFAULT_SELECTOR, || Ok(Box::new(FifoSelector)));
    builtins.insert("round_robin", || Ok(Box::new(RoundRobinSelector::default())));
    builtins
});

/// Name -> constructor table for engine selectors.
#[derive(Clone)]
pub struct SelectorFactory {
    constructors: HashMap<String, SelectorConstructor>,
}

impl Default for SelectorFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl SelectorFactory {
    /// A factory that knows `fifo` and `round_robin`.
    pub fn with_builtins() -> Self {
        let constructors = BUILTIN_SELECTORS
            .iter()
            .map(|(name, constructor)| (name.to_string(), *constructor))
            .collect();
        Self { constructors }
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: SelectorConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn EngineSelector>, SelectorError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| SelectorError::Unknown(name.to_string()))?;
        constructor()
    }

    /// Creates the named selector, falling back to [`FifoSelector`] when the
    /// name is unset, unknown or fails to build.
    pub fn create_or_default(&self, name: Option<&str>) -> Box<dyn EngineSelector> {
        let Some(name) = name else {
            return Box::new(FifoSelector);
        };
        match self.create(name) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!(selector = %name, error = %err, "Failed to load engine selector, using default");
                Box::new(FifoSelector)
            }
        }
    }
}
