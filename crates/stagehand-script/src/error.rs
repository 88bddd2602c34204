//! Error types for stagehand-script

use thiserror::Error;

/// Content loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON write error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Duplicate game: {0}")]
    DuplicateGame(String),

    #[error(transparent)]
    Core(#[from] stagehand_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
