/// Core error types for SimpleAudio
use crate::types::TrackIndex;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by providers and the controller
#[derive(Error, Debug)]
pub enum CoreError {
    /// Requested index is outside the playlist
    #[error("Track index out of range: {index} (playlist has {len} tracks)")]
    TrackOutOfRange { index: TrackIndex, len: usize },

    /// Host-side provider failure (remote call rejected, backend unavailable)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Metadata parsing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an out-of-range error for `index` in a playlist of `len` tracks
    pub fn out_of_range(index: TrackIndex, len: usize) -> Self {
        Self::TrackOutOfRange { index, len }
    }
}
