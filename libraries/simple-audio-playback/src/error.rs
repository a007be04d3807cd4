//! Error types for playback session control

use simple_audio_core::{CoreError, TrackIndex};
use thiserror::Error;

/// Playback errors
///
/// Every variant is local to the current track: the session is left in a
/// recoverable state and the user can retry or pick another track.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Provider returned no playable media for the track
    #[error("Track {0} could not be resolved to playable media")]
    UnresolvableTrack(TrackIndex),

    /// The device declined to start playback (e.g. autoplay policy)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The device reported a decode or load failure
    #[error("Device error: {0}")]
    Device(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(TrackIndex),

    /// Already at the last track
    #[error("No next track")]
    NoNextTrack,

    /// Already at the first track
    #[error("No previous track")]
    NoPreviousTrack,

    /// Provider call failed
    #[error("Provider error: {0}")]
    Provider(#[from] CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
