//! Playback session state
//!
//! The controller's own record of what is loaded and what the device is
//! doing. Transitions are methods so the readiness/duration invariant is
//! enforced in one place: both are cleared whenever a new load begins and
//! are only set again by the sink reporting a positive duration.

use crate::types::{Fault, TransportState};
use crate::volume::Volume;
use serde::{Deserialize, Serialize};
use simple_audio_core::TrackIndex;

/// Controller-owned session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    current: TrackIndex,
    state: TransportState,
    position: f64,
    duration: Option<f64>,
    volume: f64,
    repeat: bool,
    ready: bool,
    fault: Option<Fault>,
    /// Load in flight, sink still holds the previous source
    awaiting_source: bool,
}

impl PlaybackSession {
    /// Fresh session with nothing loaded
    pub fn new(current: TrackIndex, volume: f64, repeat: bool) -> Self {
        Self {
            current,
            state: TransportState::Idle,
            position: 0.0,
            duration: None,
            volume: Volume::new(volume).level(),
            repeat,
            ready: false,
            fault: None,
            awaiting_source: false,
        }
    }

    /// Session mirroring a sink that already has a source loaded
    ///
    /// Used when the panel is reopened mid-playback: nothing is reset, the
    /// displayed state is taken from the device as-is.
    pub fn resumed(
        current: TrackIndex,
        volume: f64,
        repeat: bool,
        paused: bool,
        position: f64,
        duration: Option<f64>,
    ) -> Self {
        let mut session = Self::new(current, volume, repeat);
        session.state = if paused {
            TransportState::Paused
        } else {
            TransportState::Playing
        };
        session.position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        session.mark_ready(duration.unwrap_or(f64::NAN));
        session
    }

    // ===== Transitions =====

    /// A new load started: clear everything that belongs to the old source
    pub fn begin_load(&mut self) {
        self.state = TransportState::Loading;
        self.position = 0.0;
        self.duration = None;
        self.ready = false;
        self.fault = None;
        self.awaiting_source = true;
    }

    /// The sink now holds the source for the in-flight load
    pub fn source_assigned(&mut self) {
        self.awaiting_source = false;
    }

    /// Playback confirmed for `index`
    pub fn playing(&mut self, index: TrackIndex) {
        self.current = index;
        self.state = TransportState::Playing;
        self.fault = None;
    }

    /// Source for `index` loaded without playing
    pub fn loaded_paused(&mut self, index: TrackIndex) {
        self.current = index;
        self.state = TransportState::Paused;
    }

    /// User paused
    pub fn paused(&mut self) {
        self.state = TransportState::Paused;
    }

    /// Last track finished with nothing to advance to
    pub fn ended(&mut self) {
        self.state = TransportState::Ended;
    }

    /// Enter the error state
    pub fn fail(&mut self, fault: Fault) {
        self.state = TransportState::Error;
        self.ready = false;
        self.fault = Some(fault);
        self.awaiting_source = false;
    }

    /// Sink reported a duration; only a positive finite one makes the
    /// session ready
    pub fn mark_ready(&mut self, duration: f64) -> bool {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
            self.ready = self.fault.is_none();
            self.ready
        } else {
            self.duration = None;
            self.ready = false;
            false
        }
    }

    /// Record a device (or seek) position
    pub fn set_position(&mut self, position: f64) {
        if position.is_finite() {
            self.position = position.max(0.0);
        }
    }

    /// Select a different current track without loading it
    pub fn select(&mut self, index: TrackIndex) {
        self.current = index;
    }

    /// Record the applied volume
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = Volume::new(volume).level();
    }

    /// Flip the repeat flag, returning the new value
    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    // ===== Queries =====

    /// Current track index
    pub fn current(&self) -> TrackIndex {
        self.current
    }

    /// Transport state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Whether audio is (believed to be) playing
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.state == TransportState::Loading
    }

    /// Whether the current track is in the error state
    pub fn is_error(&self) -> bool {
        self.fault.is_some()
    }

    /// Why the session failed, if it did
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Position in seconds
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds, once the sink reported it
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Duration known and positive
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Seek control enabled
    pub fn can_seek(&self) -> bool {
        self.ready && self.fault.is_none()
    }

    /// Volume (0.0 - 1.0)
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Repeat flag
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Whether sink signals still belong to the previous source
    pub fn is_awaiting_source(&self) -> bool {
        self.awaiting_source
    }
}
