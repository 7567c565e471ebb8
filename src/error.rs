use std::path::PathBuf;

use crate::validate::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("content directory does not exist and could not be created: {0}")]
    ContentDir(PathBuf),

    #[error("content is invalid:\n{0}")]
    InvalidContent(#[from] ValidationErrors),
}
