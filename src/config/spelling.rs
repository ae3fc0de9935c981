//! Spell checking configuration

use serde::Deserialize;
use std::collections::HashMap;

/// Which spell checker to build and when to use it
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SpellingConfig {
    /// Registered name of the spell checker; none disables spelling
    pub classname: Option<String>,

    /// Correct every sentence before it is matched
    #[serde(default)]
    pub check_before: bool,

    /// Correct and retry a sentence that found no match
    #[serde(default)]
    pub check_and_retry: bool,

    /// Word corrections for the dictionary checker (misspelling -> word)
    #[serde(default)]
    pub corrections: HashMap<String, String>,
}

impl SpellingConfig {
    /// Whether any spell checking step is switched on
    pub fn is_enabled(&self) -> bool {
        self.classname.is_some() && (self.check_before || self.check_and_retry)
    }
}
