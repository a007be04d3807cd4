//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued at
//! key points and drained by the host when it re-renders:
//! - State changes (loading/play/pause/end/error)
//! - Track changes
//! - Readiness (duration known)
//! - Position updates
//! - Volume and repeat changes

use crate::types::{Fault, TransportState};
use serde::{Deserialize, Serialize};
use simple_audio_core::TrackIndex;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// Current track changed
    TrackChanged {
        /// Index of the new (current) track
        index: TrackIndex,
        /// Index of the previous track
        previous: TrackIndex,
    },

    /// Duration known; seek control may be enabled
    Ready {
        /// Track duration in seconds
        duration_secs: f64,
    },

    /// Position update (device progress or seek)
    PositionUpdate {
        /// Current playback position in seconds
        position_secs: f64,
        /// Total track duration in seconds, if known
        duration_secs: Option<f64>,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0 - 1.0)
        level: f64,
    },

    /// Repeat flag toggled
    RepeatChanged {
        /// Whether repeat is now on
        enabled: bool,
    },

    /// Track metadata was enriched in place
    TrackEnriched {
        /// Index of the enriched track
        index: TrackIndex,
    },

    /// Current track failed
    Error {
        /// Failure kind
        fault: Fault,
        /// Human-readable description
        message: String,
    },
}

/// Ordered queue of pending events
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: Vec<PlaybackEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: PlaybackEvent) {
        self.pending.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending)
    }
}
