//! Render errors
//!
//! Every failure is surfaced to the caller. Nothing is retried: rendering is a
//! deterministic function of its inputs.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Failed to read source image {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode to {format}: {message}")]
    Encode { format: String, message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RenderError {
    pub fn geometry(message: impl Into<String>) -> Self {
        RenderError::Geometry(message.into())
    }

    pub fn encode(format: impl Into<String>, message: impl ToString) -> Self {
        RenderError::Encode {
            format: format.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Config(e.to_string())
    }
}
