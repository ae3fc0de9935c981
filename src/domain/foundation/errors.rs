//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Index {index} is out of range for {field} (len {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an index out of range validation error.
    pub fn index_out_of_range(field: impl Into<String>, index: usize, len: usize) -> Self {
        ValidationError::IndexOutOfRange {
            field: field.into(),
            index,
            len,
        }
    }
}
