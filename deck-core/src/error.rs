//! Error types for deck operations.

use thiserror::Error;

/// Result type for deck operations.
pub type DeckResult<T> = Result<T, DeckError>;

/// Errors that can occur in deck operations.
///
/// Editing commands never produce these: a command that names a missing
/// element or slide is a no-op. Errors are reserved for I/O and document
/// boundaries.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Presentation serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred during autosave.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The presentation document is structurally invalid.
    #[error("Invalid presentation: {0}")]
    InvalidDocument(String),

    /// Playback timers need a running tokio runtime.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}
