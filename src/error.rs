//! Error types for the retrieval-augmented answer pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No extractable documents under the source directory
    #[error("No supported documents with extractable text under '{}'", .0.display())]
    NotFound(PathBuf),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// No persisted index at the configured location
    #[error("No persisted index found at '{}' (run ingestion first)", .0.display())]
    IndexNotFound(PathBuf),

    /// Persisted index cannot be used with the current embedding setup
    #[error("Index is corrupt or incompatible: {0}")]
    IndexCorrupt(String),

    /// Language-model endpoint failure (timeout, auth, quota, malformed response)
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an index corruption error
    pub fn index_corrupt(message: impl Into<String>) -> Self {
        Self::IndexCorrupt(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}
