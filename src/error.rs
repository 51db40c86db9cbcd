// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecnetError {
    /// Input references nodes outside the universe or contradicts itself.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Percentages are undefined for this run.
    #[error("Empty graph: {0}")]
    EmptyGraph(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Generic error: {0}")]
    Other(String),
}

impl RecnetError {
    pub(crate) fn integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecnetError>;

// Allow `?` on std::io::Error by converting to RecnetError::Io with unknown path.
impl From<std::io::Error> for RecnetError {
    fn from(source: std::io::Error) -> Self {
        RecnetError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
