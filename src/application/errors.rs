//! Application error types.

use thiserror::Error;

use crate::config::ValidationError as ConfigValidationError;
use crate::domain::dialog::GuardViolation;
use crate::domain::foundation::ValidationError;
use crate::ports::StorageError;

/// Errors that abort a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Recursion depth or elapsed time exceeded its limit.
    #[error(transparent)]
    Guard(#[from] GuardViolation),

    #[error("No knowledge engine available to answer questions")]
    NoEngineAvailable,

    #[error("Knowledge engine '{engine}' failed: {message}")]
    Engine { engine: String, message: String },

    /// A sub-query or retry ran without the state of an enclosing call.
    #[error("Request context has no {0} bound")]
    NotBound(&'static str),

    #[error("Invalid conversation state: {0}")]
    InvalidState(String),
}

impl PipelineError {
    pub fn engine(engine: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Engine {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// True for recursion and timeout failures.
    pub fn is_guard_failure(&self) -> bool {
        matches!(self, PipelineError::Guard(_))
    }
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::InvalidState(err.to_string())
    }
}

/// Errors raised while registering engines. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate engine id: {0}")]
    DuplicateId(String),

    #[error("Unknown engine kind '{kind}' for engine '{id}'")]
    UnknownKind { id: String, kind: String },

    #[error("Failed to build engine '{id}': {reason}")]
    BuildFailed { id: String, reason: String },

    #[error("No engines configured")]
    Empty,
}

/// Errors raised while constructing an engine selector. Never fatal; the
/// registry falls back to first-registered selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Unknown engine selector: {0}")]
    Unknown(String),

    #[error("Failed to build engine selector '{name}': {reason}")]
    BuildFailed { name: String, reason: String },
}

/// Errors raised while wiring a bot from configuration.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_violation_is_guard_failure() {
        let err: PipelineError = GuardViolation::RecursionLimitExceeded { depth: 4, max: 3 }.into();
        assert!(err.is_guard_failure());
        assert!(err.to_string().contains("[3]"));
    }

    #[test]
    fn engine_failure_is_not_guard_failure() {
        let err = PipelineError::engine("alpha", "boom");
        assert!(!err.is_guard_failure());
        assert_eq!(err.to_string(), "Knowledge engine 'alpha' failed: boom");
    }

    #[test]
    fn validation_error_becomes_invalid_state() {
        let err: PipelineError = ValidationError::index_out_of_range("sentence", 3, 1).into();
        assert!(matches!(err, PipelineError::InvalidState(_)));
    }
}
