use thiserror::Error;

/// Errors that can occur while fetching or shaping raw sheets
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Row {row} has {width} cells but the header declares {expected}")]
    InvariantViolation {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("Duplicate header name: {name}")]
    DuplicateHeader { name: String },

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
