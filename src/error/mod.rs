//! Error handling module for gifclip

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for gifclip operations
#[derive(Error, Debug)]
pub enum GifClipError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Output file write error
    #[error("Failed to write output file: {message}")]
    OutputError { message: String },

    /// Conversion ended as failed
    #[error("Conversion failed: {cause}")]
    ConversionFailed { cause: String },

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for gifclip operations
pub type GifClipResult<T> = std::result::Result<T, GifClipError>;
