//! Error types for filter evaluation.

use crate::access::DataType;
use thiserror::Error;

/// Errors that can occur while building, checking or evaluating a filter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// No defined semantics for this operator and operand types
    #[error("Unsupported filter {operator}: {reason}")]
    UnsupportedFilter { operator: String, reason: String },

    /// Typed accessor used against a result of another type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: DataType, actual: DataType },

    /// Typed accessor used against a NULL result
    #[error("Unexpected NULL value in {context}")]
    UnexpectedNull { context: String },

    #[error("Column index {index} out of bounds for row with {row_width} columns")]
    ColumnIndexOutOfBounds { index: usize, row_width: usize },

    /// Row value disagrees with the column's declared type
    #[error("Column {index} declared as {declared} but row holds {actual}")]
    ColumnTypeMismatch {
        index: usize,
        declared: DataType,
        actual: DataType,
    },

    #[error("Malformed expression tree: {reason}")]
    MalformedTree { reason: String },

    #[error("Malformed row: {reason}")]
    MalformedRow { reason: String },

    #[error("Type check failed for expression '{expression}': {reason}")]
    TypeCheckFailed { expression: String, reason: String },

    #[error("Plan codec error: {0}")]
    Codec(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl FilterError {
    pub fn unsupported(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::UnsupportedFilter {
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// True for the failure kind callers must answer by rejecting the query
    pub fn is_unsupported(&self) -> bool {
        matches!(self, FilterError::UnsupportedFilter { .. })
    }
}

impl From<std::io::Error> for FilterError {
    fn from(e: std::io::Error) -> Self {
        FilterError::Io(e.to_string())
    }
}

impl From<bincode::Error> for FilterError {
    fn from(e: bincode::Error) -> Self {
        FilterError::Codec(e.to_string())
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
