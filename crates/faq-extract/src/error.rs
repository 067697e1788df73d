use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("heading level must be between 1 and 6 (received {0})")]
    InvalidHeadingLevel(usize),

    #[error("invalid heading title pattern '{pattern}': {source}")]
    InvalidTitlePattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read document from stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize sections: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ExtractResult<T> = Result<T, ExtractError>;
