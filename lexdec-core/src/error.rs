use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading an external word list.
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed word list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("word list is empty")]
    Empty,

    #[error("word list entry {index} has no text")]
    BlankEntry { index: usize },
}
