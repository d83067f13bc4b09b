//! Structural errors raised by table operations.
//!
//! Data-level problems (a field that does not parse for its column type) never
//! surface here; they become missing values. These variants cover programmer
//! errors, and a failed call always leaves the table untouched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column names must be unique: '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Cannot use {0} as column name")]
    ReservedColumnName(String),

    #[error("Invalid column name: '{0}'")]
    UnknownColumn(String),

    #[error("Row index {index} out of range for {row_count} rows")]
    RowOutOfRange { index: usize, row_count: usize },

    #[error("Column index {index} out of range for {column_count} columns")]
    ColumnOutOfRange { index: usize, column_count: usize },

    #[error("Start index {start} out of range for {row_count} rows")]
    StartOutOfRange { start: usize, row_count: usize },

    #[error("Invalid column type descriptor: '{0}'")]
    InvalidType(String),

    #[error("Value does not match column '{column}' of type {expected}")]
    ValueTypeMismatch { column: String, expected: String },

    #[error("Type list or header list cannot be empty")]
    EmptySchema,

    #[error("Not able to determine type of data")]
    TypeUndetermined,
}

pub type Result<T> = std::result::Result<T, TableError>;
