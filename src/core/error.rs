//! Error types for Echo Garden

use thiserror::Error;

/// Main error type for the garden
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown tree style: {0}")]
    UnknownStyle(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Canvas error: {0}")]
    Canvas(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
