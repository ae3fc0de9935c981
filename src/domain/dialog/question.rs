//! Question - one user utterance split into sentences.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::{combine_answers, Sentence};

/// One user utterance.
///
/// The cursor points at the sentence currently being answered, so an engine
/// can look back at the earlier sentences of the same utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    sentences: Vec<Sentence>,
    current_sentence_no: usize,
    sub_query: bool,
    asked_at: Timestamp,
}

impl Question {
    /// Builds a question from pre-split sentence texts.
    ///
    /// Blank pieces are dropped. If nothing is left the whole text becomes
    /// the single sentence, so a question always has at least one sentence.
    pub fn from_sentences<I, S>(text: impl Into<String>, pieces: I, sub_query: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let text = text.into();
        let mut sentences: Vec<Sentence> = pieces
            .into_iter()
            .map(|piece| -> String { piece.into() })
            .filter(|piece| !piece.trim().is_empty())
            .map(Sentence::new)
            .collect();

        if sentences.is_empty() {
            sentences.push(Sentence::new(text.clone()));
        }

        Self {
            text,
            sentences,
            current_sentence_no: 0,
            sub_query,
            asked_at: Timestamp::now(),
        }
    }

    /// Builds a question whose text is a single sentence (no splitting).
    pub fn unsplit(text: impl Into<String>, sub_query: bool) -> Self {
        let text = text.into();
        Self::from_sentences(text.clone(), [text], sub_query)
    }

    // === Accessors ===

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn sentence_mut(&mut self, index: usize) -> Option<&mut Sentence> {
        self.sentences.get_mut(index)
    }

    pub fn is_sub_query(&self) -> bool {
        self.sub_query
    }

    pub fn asked_at(&self) -> Timestamp {
        self.asked_at
    }

    // === Cursor ===

    pub fn current_sentence_no(&self) -> usize {
        self.current_sentence_no
    }

    /// Moves the cursor to `index`.
    pub fn set_current_sentence_no(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.sentences.len() {
            return Err(ValidationError::index_out_of_range(
                "sentences",
                index,
                self.sentences.len(),
            ));
        }
        self.current_sentence_no = index;
        Ok(())
    }

    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.sentences.get(self.current_sentence_no)
    }

    /// Sentences before the cursor, oldest first.
    pub fn previous_sentences(&self) -> &[Sentence] {
        &self.sentences[..self.current_sentence_no.min(self.sentences.len())]
    }

    /// Responses of all answered sentences joined in order.
    pub fn combined_response(&self) -> String {
        let answers: Vec<Option<String>> = self
            .sentences
            .iter()
            .map(|s| s.response().map(str::to_string))
            .collect();
        combine_answers(&answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_sentences_keeps_order_and_drops_blanks() {
        let question = Question::from_sentences("Hello. How are you", ["Hello.", " ", "How are you"], false);

        let texts: Vec<&str> = question.sentences().iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["Hello.", "How are you"]);
        assert!(!question.is_sub_query());
    }

    #[test]
    fn empty_split_falls_back_to_whole_text() {
        let question = Question::from_sentences("...", Vec::<String>::new(), false);
        assert_eq!(question.sentence_count(), 1);
        assert_eq!(question.sentence(0).unwrap().text(), "...");
    }

    #[test]
    fn unsplit_keeps_text_as_one_sentence() {
        let question = Question::unsplit("Hello. How are you", true);
        assert_eq!(question.sentence_count(), 1);
        assert!(question.is_sub_query());
    }

    #[test]
    fn cursor_exposes_previous_sentences() {
        let mut question = Question::from_sentences("a. b. c", ["a.", "b.", "c"], false);
        question.set_current_sentence_no(2).unwrap();

        assert_eq!(question.current_sentence().unwrap().text(), "c");
        let previous: Vec<&str> = question.previous_sentences().iter().map(|s| s.text()).collect();
        assert_eq!(previous, vec!["a.", "b."]);
    }

    #[test]
    fn cursor_rejects_out_of_range() {
        let mut question = Question::unsplit("hi", false);
        assert!(question.set_current_sentence_no(1).is_err());
        assert_eq!(question.current_sentence_no(), 0);
    }

    #[test]
    fn combined_response_skips_unanswered() {
        let mut question = Question::from_sentences("a. b", ["a.", "b"], false);
        question.sentence_mut(0).unwrap().set_response("Hi");
        assert_eq!(question.combined_response(), "Hi");

        question.sentence_mut(1).unwrap().set_response("Fine");
        assert_eq!(question.combined_response(), "Hi. Fine");
    }
}
