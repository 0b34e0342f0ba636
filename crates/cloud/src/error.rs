//! Error types for catalog search and asset download.

use thiserror::Error;

/// Errors produced while searching a catalog or fetching assets.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid STAC item {id}: {reason}")]
    InvalidItem { id: String, reason: String },

    #[error("core error: {0}")]
    Core(#[from] verdex_core::Error),
}

/// Result alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;
