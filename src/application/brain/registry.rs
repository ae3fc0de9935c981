//! Engine Registry - the set of knowledge engines a bot can answer with.
//!
//! Engines are registered once at startup, in order, keyed by id. The
//! configured [`EngineSelector`] picks one per top-level question.
//!
//! # Example
//!
//! ```ignore
//! let factory = adapters::engine::builtin_engine_factory();
//! let registry = EngineRegistry::load_engines(&config.brains, &factory)?
//!     .with_selector(SelectorFactory::with_builtins().create_or_default(Some("round_robin")));
//!
//! let engine = registry.select_engine().expect("at least one engine");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::RegistryError;
use crate::config::EngineConfig;
use crate::ports::KnowledgeEngine;

use super::{EngineSelector, FifoSelector, RegisteredEngine};

/// Builds one engine from its configuration.
pub type EngineConstructor =
    Arc<dyn Fn(&EngineConfig) -> Result<Arc<dyn KnowledgeEngine>, String> + Send + Sync>;

/// Kind -> constructor table for knowledge engines.
#[derive(Clone, Default)]
pub struct EngineFactory {
    constructors: HashMap<String, EngineConstructor>,
}

impl EngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `kind`, replacing any earlier one.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&EngineConfig) -> Result<Arc<dyn KnowledgeEngine>, String> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.into(), Arc::new(constructor));
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn build(&self, config: &EngineConfig) -> Result<Arc<dyn KnowledgeEngine>, RegistryError> {
        let constructor =
            self.constructors
                .get(&config.kind)
                .ok_or_else(|| RegistryError::UnknownKind {
                    id: config.id.clone(),
                    kind: config.kind.clone(),
                })?;

        constructor(config).map_err(|reason| RegistryError::BuildFailed {
            id: config.id.clone(),
            reason,
        })
    }
}

/// Ordered engines plus the strategy for picking one.
pub struct EngineRegistry {
    engines: Vec<RegisteredEngine>,
    selector: Box<dyn EngineSelector>,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineRegistry {
    /// An empty registry using first-registered selection.
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            selector: Box::new(FifoSelector),
        }
    }

    /// Builds and registers every configured engine, in order.
    ///
    /// # Errors
    ///
    /// Any construction failure or duplicate id aborts loading.
    pub fn load_engines(
        configs: &[EngineConfig],
        factory: &EngineFactory,
    ) -> Result<Self, RegistryError> {
        if configs.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut registry = Self::new();
        for config in configs {
            let engine = factory.build(config)?;
            registry.register(engine)?;
            tracing::info!(engine = %config.id, kind = %config.kind, "Loaded knowledge engine");
        }
        Ok(registry)
    }

    /// Adds an engine after the ones already registered.
    pub fn register(&mut self, engine: Arc<dyn KnowledgeEngine>) -> Result<(), RegistryError> {
        if self.engine(engine.id()).is_some() {
            return Err(RegistryError::DuplicateId(engine.id().to_string()));
        }
        self.engines.push(RegisteredEngine::new(engine));
        Ok(())
    }

    pub fn with_selector(mut self, selector: Box<dyn EngineSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector_name(&self) -> &str {
        self.selector.name()
    }

    /// Ids in registration order.
    pub fn engine_ids(&self) -> Vec<&str> {
        self.engines.iter().map(RegisteredEngine::id).collect()
    }

    pub fn engine(&self, id: &str) -> Option<Arc<dyn KnowledgeEngine>> {
        self.engines
            .iter()
            .find(|entry| entry.id() == id)
            .map(|entry| entry.engine().clone())
    }

    /// Picks the engine for a new top-level question.
    pub fn select_engine(&self) -> Option<Arc<dyn KnowledgeEngine>> {
        self.selector.select(&self.engines)
    }

    /// The engine the next selection would pick, leaving selector state alone.
    pub fn peek_engine(&self) -> Option<Arc<dyn KnowledgeEngine>> {
        self.selector.peek(&self.engines)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.engine_ids())
            .field("selector", &self.selector.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{PipelineError, RequestContext};
    use crate::ports::SubQueryResolver;
    use async_trait::async_trait;

    struct StubEngine(String);

    #[async_trait]
    impl KnowledgeEngine for StubEngine {
        fn id(&self) -> &str {
            &self.0
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
    }

    fn stub_factory() -> EngineFactory {
        let mut factory = EngineFactory::new();
        factory.register("stub", |config: &EngineConfig| {
            Ok(Arc::new(StubEngine(config.id.clone())) as Arc<dyn KnowledgeEngine>)
        });
        factory.register("broken", |_config: &EngineConfig| Err("no patterns".to_string()));
        factory
    }

    fn stub_config(id: &str) -> EngineConfig {
        EngineConfig {
            kind: "stub".to_string(),
            ..EngineConfig::new(id)
        }
    }

    #[test]
    fn load_engines_keeps_registration_order() {
        let configs = vec![stub_config("alpha"), stub_config("beta"), stub_config("gamma")];
        let registry = EngineRegistry::load_engines(&configs, &stub_factory()).unwrap();

        assert_eq!(registry.engine_ids(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(registry.select_engine().unwrap().id(), "alpha");
        assert_eq!(registry.selector_name(), "fifo");
    }

    #[test]
    fn lookup_by_id() {
        let configs = vec![stub_config("alpha"), stub_config("beta")];
        let registry = EngineRegistry::load_engines(&configs, &stub_factory()).unwrap();

        assert_eq!(registry.engine("beta").unwrap().id(), "beta");
        assert!(registry.engine("delta").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let configs = vec![stub_config("alpha"), stub_config("alpha")];
        let result = EngineRegistry::load_engines(&configs, &stub_factory());
        assert_eq!(result.err(), Some(RegistryError::DuplicateId("alpha".to_string())));
    }

    #[test]
    fn unknown_kind_is_fatal() {
        let configs = vec![EngineConfig {
            kind: "neural".to_string(),
            ..EngineConfig::new("alpha")
        }];
        let result = EngineRegistry::load_engines(&configs, &stub_factory());
        assert!(matches!(result, Err(RegistryError::UnknownKind { kind, .. }) if kind == "neural"));
    }

    #[test]
    fn construction_failure_is_fatal() {
        let configs = vec![
            stub_config("alpha"),
            EngineConfig {
                kind: "broken".to_string(),
                ..EngineConfig::new("beta")
            },
        ];
        let result = EngineRegistry::load_engines(&configs, &stub_factory());
        assert!(matches!(result, Err(RegistryError::BuildFailed { id, .. }) if id == "beta"));
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let result = EngineRegistry::load_engines(&[], &stub_factory());
        assert_eq!(result.err(), Some(RegistryError::Empty));
    }

    #[test]
    fn empty_registry_selects_nothing() {
        assert!(EngineRegistry::new().select_engine().is_none());
    }

    #[test]
    fn factory_lists_kinds_sorted() {
        assert_eq!(stub_factory().kinds(), vec!["broken", "stub"]);
    }
}
