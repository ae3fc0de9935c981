//! Knowledge engine ("brain") configuration

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// One engine instance to register at startup
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Registry key; must be unique
    pub id: String,

    /// Registered engine kind to construct
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Pattern -> template table for the `table` kind
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,

    /// Defaults seeded into new conversations
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Bot properties (name, version, birthdate, ...)
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl EngineConfig {
    /// An empty `table` engine
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: default_kind(),
            patterns: BTreeMap::new(),
            variables: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>, template: impl Into<String>) -> Self {
        self.patterns.insert(pattern.into(), template.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

pub(crate) fn default_kind() -> String {
    "table".to_string()
}

pub(crate) fn default_engines() -> Vec<EngineConfig> {
    vec![EngineConfig::new("default")
        .with_pattern("HELLO", "Hi there!")
        .with_pattern("HI", "srai:HELLO")
        .with_pattern("BYE", "Goodbye!")
        .with_property("name", "Chatbot")
        .with_property("version", env!("CARGO_PKG_VERSION"))]
}
