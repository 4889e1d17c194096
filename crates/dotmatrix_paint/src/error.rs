//! Raster error types

use thiserror::Error;

/// Errors raised by drawing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    /// A drawing argument is outside its valid range
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A raw pixel buffer does not match its declared dimensions
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

impl PaintError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PaintError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for raster operations
pub type Result<T> = std::result::Result<T, PaintError>;
