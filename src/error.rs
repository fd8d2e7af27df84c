//! Error types for the narrator

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, NarratorError>;

/// Everything that can go wrong outside the expected "not available" outcomes
#[derive(Error, Debug)]
pub enum NarratorError {
    /// The delivery sink rejected an announcement
    #[error("delivery failed: {0}")]
    Sink(String),

    /// Localization table could not be loaded
    #[error("string table error: {0}")]
    Strings(String),

    /// A replay script line was malformed
    #[error("script line {line}: {reason}")]
    Script { line: usize, reason: String },

    /// The drain task panicked or was aborted
    #[error("drain task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
