//! Core types for playback session control

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing loaded yet
    Idle,

    /// Resolving or assigning a track
    Loading,

    /// Currently playing
    Playing,

    /// Source loaded, not playing
    Paused,

    /// Reached the end of the playlist
    Ended,

    /// Current track failed; user must retry or navigate away
    Error,
}

/// Why the session entered the error state
///
/// All kinds look the same to the user; the kind is kept for logging and
/// for hosts that want to word the error affordance differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    /// Provider returned no media reference (missing/corrupt file)
    UnresolvableTrack,

    /// Device declined to start playback
    PlaybackRejected,

    /// Device reported a decode/load failure mid-session
    DeviceError,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Distance kept from the end of the track when seeking (default: 0.25 s)
    pub seek_guard_margin_secs: f64,

    /// How long device position updates are ignored after a seek (default: 150 ms)
    pub seek_cooldown_ms: u64,

    /// Volume used when the provider cannot supply one (default: 1.0)
    pub fallback_volume: f64,

    /// Load the initial track (without playing) when attaching to an empty sink
    /// (default: false)
    pub preload_on_attach: bool,
}

impl ControllerConfig {
    /// Seek cooldown as a `Duration`
    pub fn seek_cooldown(&self) -> Duration {
        Duration::from_millis(self.seek_cooldown_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seek_guard_margin_secs: 0.25,
            seek_cooldown_ms: 150,
            fallback_volume: 1.0,
            preload_on_attach: false,
        }
    }
}
