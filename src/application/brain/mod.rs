//! Engine registration and selection.

mod registry;
mod selector;

pub use registry::{EngineConstructor, EngineFactory, EngineRegistry};
pub use selector::{
    EngineSelector, FifoSelector, RegisteredEngine, RoundRobinSelector, SelectorConstructor,
    SelectorFactory, DEFAULT_SELECTOR,
};
