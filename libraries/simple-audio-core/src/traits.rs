//! Core traits for SimpleAudio

use crate::error::Result;
use crate::types::{Track, TrackIndex};
use async_trait::async_trait;

/// Host-side track provider
///
/// The host process resolves track indices to playable media and persists
/// cross-session state (initial track, volume, repeat flag). Every call is a
/// request/response round trip and may take arbitrarily long; callers must not
/// assume ordering between overlapping calls.
#[async_trait]
pub trait TrackProvider: Send + Sync {
    // ========================================================================
    // Playlist
    // ========================================================================

    /// Get the full playlist
    ///
    /// Entries carry at least an index and a title; everything else is
    /// optional display metadata.
    async fn get_playlist(&self) -> Result<Vec<Track>>;

    /// Resolve a track to playable media
    ///
    /// A returned track without `media` signals an unresolvable track
    /// (missing or corrupt file).
    async fn load_track(&self, index: TrackIndex) -> Result<Track>;

    /// Get full tags for a track (lazy enrichment)
    async fn get_track_metadata(&self, index: TrackIndex) -> Result<Track>;

    /// Get the last active track index
    async fn get_initial_track(&self) -> Result<TrackIndex>;

    /// Persist the last active track index
    ///
    /// Called once a load has actually been applied to the device, never for
    /// resolutions that were superseded.
    async fn set_initial_track(&self, index: TrackIndex) -> Result<()>;

    // ========================================================================
    // Persisted session state
    // ========================================================================

    /// Get persisted volume (0.0 - 1.0)
    async fn get_volume(&self) -> Result<f64>;

    /// Persist volume (0.0 - 1.0)
    async fn set_volume(&self, volume: f64) -> Result<()>;

    /// Get persisted repeat flag
    async fn get_repeat(&self) -> Result<bool>;

    /// Persist repeat flag
    async fn set_repeat(&self, repeat: bool) -> Result<()>;
}
