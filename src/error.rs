//! Error types for SEG-Y operations

use thiserror::Error;

/// Main error type for SEG-Y operations
#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Byte offset, field, trace index or sample index outside its bounds
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Line number absent from the line set
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Geometry that cannot be addressed as a regular cube
    #[error("Structural inconsistency: {0}")]
    Structural(String),

    #[error("Invalid SEG-Y format: {0}")]
    InvalidFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Specialized Result type for SEG-Y operations
pub type Result<T> = std::result::Result<T, SegyError>;

impl From<serde_json::Error> for SegyError {
    fn from(err: serde_json::Error) -> Self {
        SegyError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SegyError {
    fn from(err: ndarray::ShapeError) -> Self {
        SegyError::InvalidArgument(err.to_string())
    }
}

impl SegyError {
    pub(crate) fn read_only() -> Self {
        SegyError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "file was opened read-only",
        ))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SegyError::OutOfRange(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SegyError::NotFound(_))
    }
}
