//! Error types for the update compiler and executor.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The statement violates the restricted grammar. Raised by the
    /// validator before any deeper parsing happens.
    #[error("format error: {0}")]
    Format(String),

    /// Clause extraction failed on text the validator accepted. This points
    /// at a validator/parser contract bug rather than caller input.
    #[error("parse error: {0}")]
    Parse(String),

    /// A column reference could not be mapped to a declared alias or known
    /// column, or an ON predicate could not be matched to a key pair.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// A SET expression calls a function the caller did not supply.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    // Evaluation-time faults
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}
