//! Table Engine - a pattern table knowledge engine.
//!
//! Each rule maps a pattern to a template:
//!
//! - Patterns are words matched case-insensitively, ignoring surrounding
//!   punctuation. `*` matches one or more words.
//! - `<star/>` in a template is replaced by the words the next `*` matched.
//! - A template starting with `srai:` is a redirect: the rest is answered
//!   as a sub-query and its answer becomes this rule's answer.
//!
//! Rules with more literal words are tried first, then rules with fewer
//! wildcards, so `HELLO THERE` wins over `HELLO *`, which wins over `*`.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::{PipelineError, RequestContext};
use crate::config::EngineConfig;
use crate::ports::{KnowledgeEngine, SubQueryResolver};

/// Template prefix marking a redirect.
pub const REDIRECT_PREFIX: &str = "srai:";

/// Template placeholder for wildcard captures.
pub const STAR: &str = "<star/>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternToken {
    Word(String),
    Wildcard,
}

#[derive(Debug, Clone)]
struct Rule {
    tokens: Vec<PatternToken>,
    template: String,
}

impl Rule {
    fn parse(pattern: &str, template: &str) -> Result<Self, String> {
        let tokens: Vec<PatternToken> = pattern
            .split_whitespace()
            .map(|word| match word {
                "*" => PatternToken::Wildcard,
                _ => PatternToken::Word(normalise_word(word)),
            })
            .filter(|token| !matches!(token, PatternToken::Word(word) if word.is_empty()))
            .collect();

        if tokens.is_empty() {
            return Err(format!("pattern '{}' has no words", pattern));
        }

        Ok(Self {
            tokens,
            template: template.to_string(),
        })
    }

    fn literal_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, PatternToken::Word(_)))
            .count()
    }

    fn wildcard_count(&self) -> usize {
        self.tokens.len() - self.literal_count()
    }

    /// Matches normalised `words`, returning the wildcard spans.
    fn matches(&self, words: &[String]) -> Option<Vec<(usize, usize)>> {
        let mut captures = Vec::new();
        match_tokens(&self.tokens, words, 0, &mut captures).then_some(captures)
    }
}

fn match_tokens(
    tokens: &[PatternToken],
    words: &[String],
    offset: usize,
    captures: &mut Vec<(usize, usize)>,
) -> bool {
    match tokens.split_first() {
        None => offset == words.len(),
        Some((PatternToken::Word(expected), rest)) => {
            words.get(offset) == Some(expected) && match_tokens(rest, words, offset + 1, captures)
        }
        Some((PatternToken::Wildcard, rest)) => {
            for end in offset + 1..=words.len() {
                captures.push((offset, end));
                if match_tokens(rest, words, end, captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}

fn normalise_word(word: &str) -> String {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
        .to_uppercase()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pattern-table engine built from configuration.
#[derive(Debug, Clone)]
pub struct TableEngine {
    id: String,
    rules: Vec<Rule>,
    variables: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl TableEngine {
    /// Builds the engine from its configuration.
    ///
    /// # Errors
    ///
    /// A pattern with no words.
    pub fn from_config(config: &EngineConfig) -> Result<Self, String> {
        let mut rules = config
            .patterns
            .iter()
            .map(|(pattern, template)| Rule::parse(pattern, template))
            .collect::<Result<Vec<_>, _>>()?;
        rules.sort_by_key(|rule| (std::cmp::Reverse(rule.literal_count()), rule.wildcard_count()));

        Ok(Self {
            id: config.id.clone(),
            rules,
            variables: config.variables.clone(),
            properties: config.properties.clone(),
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Finds the first matching rule and renders its template.
    fn lookup(&self, sentence: &str) -> Option<String> {
        let original: Vec<&str> = sentence.split_whitespace().collect();
        let words: Vec<String> = original.iter().map(|word| normalise_word(word)).collect();

        self.rules.iter().find_map(|rule| {
            let captures = rule.matches(&words)?;
            let mut rendered = rule.template.clone();
            for (start, end) in captures {
                if !rendered.contains(STAR) {
                    break;
                }
                let captured = original[start..end].join(" ");
                rendered = rendered.replacen(STAR, &captured, 1);
            }
            Some(rendered)
        })
    }
}

#[async_trait]
impl KnowledgeEngine for TableEngine {
    fn id(&self) -> &str {
        &self.id
    }

    async fn answer(
        &self,
        resolver: &dyn SubQueryResolver,
        ctx: &mut RequestContext,
        sentence: &str,
        _sub_query: bool,
    ) -> Result<Option<String>, PipelineError> {
        let Some(template) = self.lookup(sentence) else {
            return Ok(None);
        };

        match template.strip_prefix(REDIRECT_PREFIX) {
            Some(target) => {
                tracing::debug!("Engine [{}] redirecting [{}] to [{}]", self.id, sentence, target.trim());
                resolver.resolve(ctx, target.trim()).await.map(Some)
            }
            None => Ok(Some(template)),
        }
    }

    async fn pre_process(&self, _ctx: &RequestContext, text: &str) -> String {
        collapse_whitespace(text)
    }

    async fn post_process(&self, _ctx: &RequestContext, response: &str) -> String {
        collapse_whitespace(response)
    }

    fn variables(&self) -> HashMap<String, String> {
        self.variables.clone()
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}
