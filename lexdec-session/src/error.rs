use std::path::PathBuf;
use thiserror::Error;

/// Failures writing to or removing from session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access session storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode trials: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}
