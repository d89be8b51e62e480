//! Error types shared across Keyforge crates.

use std::path::PathBuf;

/// Top-level error type for Keyforge operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyforgeError {
    #[error("Animation error: {message}")]
    Animation { message: String },

    #[error("Transfer error: {message}")]
    Transfer { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid frame rate: {fps}")]
    InvalidFrameRate { fps: f64 },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using KeyforgeError.
pub type KeyforgeResult<T> = Result<T, KeyforgeError>;

impl KeyforgeError {
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation {
            message: msg.into(),
        }
    }

    pub fn transfer(msg: impl Into<String>) -> Self {
        Self::Transfer {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn parameter_not_found(name: impl Into<String>) -> Self {
        Self::ParameterNotFound { name: name.into() }
    }
}
