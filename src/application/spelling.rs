//! Spell checker construction by registered name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SpellingConfig;
use crate::ports::SpellChecker;

/// Builds a spell checker from the spelling configuration.
pub type SpellCheckerConstructor =
    Arc<dyn Fn(&SpellingConfig) -> Result<Arc<dyn SpellChecker>, String> + Send + Sync>;

/// When the pipeline consults the spell checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellingOptions {
    /// Correct each top-level sentence before it is matched.
    pub check_before: bool,
    /// Correct and retry a top-level sentence that found no match.
    pub check_and_retry: bool,
}

impl From<&SpellingConfig> for SpellingOptions {
    fn from(config: &SpellingConfig) -> Self {
        Self {
            check_before: config.check_before,
            check_and_retry: config.check_and_retry,
        }
    }
}

/// Name -> constructor table for spell checkers.
#[derive(Clone, Default)]
pub struct SpellCheckerFactory {
    constructors: HashMap<String, SpellCheckerConstructor>,
}

impl SpellCheckerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&SpellingConfig) -> Result<Arc<dyn SpellChecker>, String> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Builds the configured checker.
    ///
    /// Returns `None` when no checker is named. An unknown name or a failing
    /// constructor is logged and also yields `None`; the bot then runs
    /// without spelling correction.
    pub fn create(&self, config: &SpellingConfig) -> Option<Arc<dyn SpellChecker>> {
        let Some(name) = config.classname.as_deref() else {
            if config.check_before || config.check_and_retry {
                tracing::warn!("Spell checking switched on but no spell checker named");
            }
            return None;
        };
        let Some(constructor) = self.constructors.get(name) else {
            tracing::error!(checker = %name, "Unknown spell checker");
            return None;
        };

        match constructor(config) {
            Ok(checker) => {
                tracing::info!(checker = %name, "Loaded spell checker");
                Some(checker)
            }
            Err(reason) => {
                tracing::error!(checker = %name, %reason, "Failed to initiate spell checker");
                None
            }
        }
    }
}
