//! Error types for bookclub-core.

use bookclub_sheet::SheetError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while typing, deriving or aggregating tables.
///
/// Bad cell values never show up here in lenient mode; they become nulls.
/// Everything below is a shape or configuration problem.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A schema or query referenced a column the table does not have.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A month cell held something other than an English month name.
    #[error("Unknown month name: '{0}'")]
    UnknownMonthName(String),

    /// An argument was outside the domain of the operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw row was wider than its header row.
    #[error("Invariant violation: row {row} has {width} cells, header declares {expected}")]
    InvariantViolation {
        row: usize,
        width: usize,
        expected: usize,
    },

    /// An operation needed a different column type.
    #[error("Type mismatch on column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        got: &'static str,
    },

    /// Strict-mode coercion failure.
    #[error("Cannot coerce '{value}' in column '{column}' (row {row}) to {expected}")]
    Coercion {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// Source or normalization failure.
    #[error(transparent)]
    Sheet(SheetError),

    /// Arrow conversion failure.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl CoreError {
    /// Create a type mismatch error.
    pub fn type_mismatch(column: impl Into<String>, expected: &'static str, got: &'static str) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            got,
        }
    }
}

impl From<SheetError> for CoreError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::InvariantViolation {
                row,
                width,
                expected,
            } => Self::InvariantViolation {
                row,
                width,
                expected,
            },
            other => Self::Sheet(other),
        }
    }
}
