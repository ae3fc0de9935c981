//! Sentence - one unit of text inside a question.

use serde::{Deserialize, Serialize};

/// A unit of text within a question.
///
/// Keeps the text as the user typed it next to the working text, which the
/// spell checker may rewrite in place. The response is filled in once the
/// pipeline has an answer (or has fallen back to the default response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    original: String,
    text: String,
    response: Option<String>,
}

impl Sentence {
    /// Creates a sentence with no response yet.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            original: text.clone(),
            text,
            response: None,
        }
    }

    /// The text exactly as it was split out of the question.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The working text (after any spelling correction).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the working text, keeping the original for reference.
    pub fn replace_text(&mut self, corrected: impl Into<String>) {
        self.text = corrected.into();
    }

    /// Whether spelling correction changed this sentence.
    pub fn is_corrected(&self) -> bool {
        self.text != self.original
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn set_response(&mut self, response: impl Into<String>) {
        self.response = Some(response.into());
    }

    /// Number of whitespace-separated words in the working text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sentence_has_no_response() {
        let sentence = Sentence::new("Hello there");
        assert_eq!(sentence.text(), "Hello there");
        assert_eq!(sentence.response(), None);
        assert_eq!(sentence.word_count(), 2);
    }

    #[test]
    fn replace_text_keeps_original() {
        let mut sentence = Sentence::new("helo");
        sentence.replace_text("hello");

        assert_eq!(sentence.original(), "helo");
        assert_eq!(sentence.text(), "hello");
        assert!(sentence.is_corrected());
    }

    #[test]
    fn set_response_overwrites() {
        let mut sentence = Sentence::new("hi");
        sentence.set_response("first");
        sentence.set_response("second");
        assert_eq!(sentence.response(), Some("second"));
    }
}
