//! Spell Checker Port - corrects user text before or after a failed match.

use async_trait::async_trait;

/// Port for spelling correction.
#[async_trait]
pub trait SpellChecker: Send + Sync {
    /// Returns the corrected text; unchanged text when nothing needs fixing.
    async fn correct(&self, text: &str) -> String;

    /// Name the checker was registered under.
    fn name(&self) -> &str;
}
