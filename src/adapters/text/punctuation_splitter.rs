//! Sentence splitting on terminal punctuation.

use crate::ports::SentenceSplitter;

/// Characters that end a sentence unless another character follows directly.
pub const DEFAULT_TERMINATORS: [char; 4] = ['.', '?', '!', ';'];

/// Splits after a terminator that is followed by whitespace or the end of
/// the text. The terminator stays with its sentence, so "3.5 apples" is
/// one sentence and "Hello. How are you" is two.
#[derive(Debug, Clone)]
pub struct PunctuationSplitter {
    terminators: Vec<char>,
}

impl PunctuationSplitter {
    pub fn new(terminators: impl IntoIterator<Item = char>) -> Self {
        Self {
            terminators: terminators.into_iter().collect(),
        }
    }

    fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }
}

impl Default for PunctuationSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATORS)
    }
}

impl SentenceSplitter for PunctuationSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if self.is_terminator(c) && at_boundary {
                flush(&mut current, &mut sentences);
            }
        }
        flush(&mut current, &mut sentences);

        sentences
    }
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}
