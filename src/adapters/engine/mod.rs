//! Knowledge engine adapters.

mod table_engine;

pub use table_engine::{TableEngine, REDIRECT_PREFIX, STAR};

use std::sync::Arc;

use crate::application::EngineFactory;
use crate::config::EngineConfig;
use crate::ports::KnowledgeEngine;

/// A factory knowing the `table` engine kind.
pub fn builtin_engine_factory() -> EngineFactory {
    let mut factory = EngineFactory::new();
    factory.register("table", |config: &EngineConfig| {
        TableEngine::from_config(config).map(|engine| Arc::new(engine) as Arc<dyn KnowledgeEngine>)
    });
    factory
}
