//! Error types for vault operations.

use std::path::PathBuf;

use thiserror::Error;
use wordtools_core::WordToolsError;

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Core(#[from] WordToolsError),

    #[error("vault root does not exist or is not a directory: {0}")]
    NotFound(PathBuf),

    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk vault: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("history file '{path}' is malformed: {source}")]
    History {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl VaultError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
