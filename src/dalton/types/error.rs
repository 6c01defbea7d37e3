//! Custom error types for the dalton-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DaltonError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The file's identifying label record is not the one expected for this file kind.
    #[error("Format mismatch: expected label '{expected}', found '{found}'")]
    FormatMismatch { expected: String, found: String },

    /// A record could not be decoded (broken framing, truncated payload, inconsistent counts).
    #[error("Decode error: {0}")]
    Decode(String),

    /// A record's byte length does not match what the field or matrix layout requires.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: String,
        expected: u64,
        found: u64,
    },

    /// End of file was reached before an expected record.
    #[error("Missing record: {0}")]
    MissingRecord(String),

    /// A requested property label does not appear in the file.
    #[error("Label '{0}' not found")]
    NotFound(String),

    /// A symmetry-block index beyond the number of blocks.
    #[error("Block index {index} out of range for a matrix with {count} blocks")]
    OutOfRange { index: usize, count: usize },

    /// An operation that is not defined for the matrix's storage kind or shape.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A reader configuration value that the decoder cannot honor.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DaltonError {
    /// True for both decode variants: broken framing and length/layout mismatches.
    pub fn is_decode(&self) -> bool {
        matches!(self, DaltonError::Decode(_) | DaltonError::SizeMismatch { .. })
    }
}

/// A convenience `Result` type alias using the crate's `DaltonError` type.
pub type Result<T> = std::result::Result<T, DaltonError>;
