//! Conversation - per-user dialog history and variable store.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::foundation::{Timestamp, UserId};

use super::Question;

/// Variable holding the active topic.
pub const TOPIC_VARIABLE: &str = "topic";

/// Topic value meaning "no particular topic".
pub const DEFAULT_TOPIC: &str = "*";

/// Default cap on retained top-level questions.
pub const DEFAULT_MAX_HISTORIES: usize = 100;

/// Per-user dialog history plus a key/value variable store.
///
/// History is append-only for top-level questions. Sub-queries push a
/// question while they run and pop it when done, so at any instant the tail
/// of the history mirrors the active call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    user_id: UserId,
    history: Vec<Question>,
    variables: BTreeMap<String, String>,
    max_histories: usize,
    created_at: Timestamp,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(user_id: UserId, max_histories: usize) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert(TOPIC_VARIABLE.to_string(), DEFAULT_TOPIC.to_string());

        Self {
            user_id,
            history: Vec::new(),
            variables,
            max_histories: max_histories.max(1),
            created_at: Timestamp::now(),
        }
    }

    // === Accessors ===

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn history(&self) -> &[Question] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn max_histories(&self) -> usize {
        self.max_histories
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.history.get(index)
    }

    pub fn question_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.history.get_mut(index)
    }

    /// The most recently recorded question (the one being answered).
    pub fn current_question(&self) -> Option<&Question> {
        self.history.last()
    }

    /// The question `offset` places before the current one (1 = previous).
    pub fn previous_question(&self, offset: usize) -> Option<&Question> {
        self.history
            .len()
            .checked_sub(offset + 1)
            .and_then(|index| self.history.get(index))
    }

    // === History ===

    /// Appends a question and returns its index.
    ///
    /// Top-level questions evict the oldest entries beyond `max_histories`.
    /// Sub-query questions never evict, which keeps the indices of the
    /// in-flight questions below them stable.
    pub fn record_question(&mut self, question: Question) -> usize {
        if !question.is_sub_query() {
            while self.history.len() >= self.max_histories {
                self.history.remove(0);
            }
        }
        self.history.push(question);
        self.history.len() - 1
    }

    /// Removes and returns the most recent question.
    pub fn pop_question(&mut self) -> Option<Question> {
        self.history.pop()
    }

    // === Variables ===

    /// Seeds variables from engine defaults without overwriting existing values.
    pub fn load_initial_variables(&mut self, defaults: &HashMap<String, String>) {
        for (name, value) in defaults {
            self.variables
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        // Engine defaults win over the built-in topic placeholder.
        if let Some(topic) = defaults.get(TOPIC_VARIABLE) {
            if self.topic() == DEFAULT_TOPIC {
                self.variables.insert(TOPIC_VARIABLE.to_string(), topic.clone());
            }
        }
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn topic(&self) -> &str {
        self.variable(TOPIC_VARIABLE).unwrap_or(DEFAULT_TOPIC)
    }

    // === Persistence ===

    /// Merges a previously stored conversation into this one.
    ///
    /// Stored history replaces the in-memory history (trimmed to
    /// `max_histories`) and stored variables override current values. Unless
    /// `restore_last_topic` is set the topic goes back to [`DEFAULT_TOPIC`].
    pub fn restore_from(&mut self, stored: Conversation, restore_last_topic: bool) {
        let skip = stored.history.len().saturating_sub(self.max_histories);
        self.history = stored.history.into_iter().skip(skip).collect();
        self.variables.extend(stored.variables);

        if !restore_last_topic {
            self.variables
                .insert(TOPIC_VARIABLE.to_string(), DEFAULT_TOPIC.to_string());
        }
    }
}
