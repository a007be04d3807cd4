/// Library-specific errors
use simple_audio_core::{CoreError, TrackIndex};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Index outside the scanned library
    #[error("Track index out of range: {index} (library has {len} tracks)")]
    OutOfRange { index: TrackIndex, len: usize },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path exists but cannot be used
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking worker panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// State file (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<LibraryError> for CoreError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::OutOfRange { index, len } => CoreError::out_of_range(index, len),
            LibraryError::Io(e) => CoreError::Io(e),
            LibraryError::Json(e) => CoreError::Serialization(e),
            LibraryError::Lofty(e) => CoreError::metadata(e.to_string()),
            LibraryError::Config(msg) => CoreError::invalid_input(msg),
            other => CoreError::provider(other.to_string()),
        }
    }
}
