//! Error types for canvas, shape, and configuration operations.

use thiserror::Error;

/// Errors that can occur while building shapes or configuring the canvas.
///
/// Index-based vertex operations are not represented here: an out-of-range
/// vertex index is a programming error and panics via `assert!`.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Shape type string is not one of the supported kinds
    #[error("Unexpected shape_type: {value}")]
    InvalidShapeType {
        /// The rejected shape type string
        value: String,
    },

    /// Configuration value out of range or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading scripts or records
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CanvasError {
    /// Create an invalid shape type error.
    pub fn invalid_shape_type(value: impl Into<String>) -> Self {
        Self::InvalidShapeType {
            value: value.into(),
        }
    }

    /// Create an invalid configuration error with a message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CanvasError>;
