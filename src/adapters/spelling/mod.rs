//! Spell checker adapters.

mod dictionary_spell_checker;

pub use dictionary_spell_checker::DictionarySpellChecker;

use std::sync::Arc;

use crate::application::SpellCheckerFactory;
use crate::config::SpellingConfig;
use crate::ports::SpellChecker;

/// A factory knowing the `dictionary` checker, built from the configured
/// corrections.
pub fn builtin_spell_checker_factory() -> SpellCheckerFactory {
    let mut factory = SpellCheckerFactory::new();
    factory.register("dictionary", |config: &SpellingConfig| {
        if config.corrections.is_empty() {
            return Err("no corrections configured".to_string());
        }
        Ok(Arc::new(DictionarySpellChecker::new(&config.corrections)) as Arc<dyn SpellChecker>)
    });
    factory
}
