//! Dictionary Spell Checker - word-for-word corrections from a lookup table.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::ports::SpellChecker;

/// Replaces known misspellings word by word.
///
/// Lookups ignore case and trailing punctuation; the punctuation is kept.
#[derive(Debug, Clone, Default)]
pub struct DictionarySpellChecker {
    corrections: HashMap<String, String>,
}

impl DictionarySpellChecker {
    pub fn new<I, K, V>(corrections: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let corrections = corrections
            .into_iter()
            .map(|(wrong, right)| (wrong.as_ref().to_lowercase(), right.into()))
            .collect();
        Self { corrections }
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    fn correct_word(&self, word: &str) -> Option<String> {
        let stem = word.trim_end_matches(|c: char| c.is_ascii_punctuation());
        let suffix = &word[stem.len()..];
        self.corrections
            .get(&stem.to_lowercase())
            .map(|replacement| format!("{}{}", replacement, suffix))
    }
}

#[async_trait]
impl SpellChecker for DictionarySpellChecker {
    async fn correct(&self, text: &str) -> String {
        let mut changed = false;
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| match self.correct_word(word) {
                Some(corrected) => {
                    changed = true;
                    corrected
                }
                None => word.to_string(),
            })
            .collect();

        if changed {
            words.join(" ")
        } else {
            text.to_string()
        }
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> DictionarySpellChecker {
        DictionarySpellChecker::new([("helo", "hello"), ("teh", "the"), ("Wrld", "world")])
    }

    #[tokio::test]
    async fn corrects_known_words() {
        assert_eq!(checker().correct("helo").await, "hello");
        assert_eq!(checker().correct("teh cat").await, "the cat");
    }

    #[tokio::test]
    async fn ignores_case_and_keeps_punctuation() {
        assert_eq!(checker().correct("HELO wrld!").await, "hello world!");
    }

    #[tokio::test]
    async fn unknown_text_is_returned_unchanged() {
        assert_eq!(checker().correct("good  morning").await, "good  morning");
    }

    #[test]
    fn keys_are_lowercased() {
        let checker = checker();
        assert_eq!(checker.len(), 3);
        assert_eq!(checker.correct_word("wrld"), Some("world".to_string()));
    }
}
