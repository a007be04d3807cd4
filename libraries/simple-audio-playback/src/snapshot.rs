//! Render-ready view of the session for the panel

use crate::session::PlaybackSession;
use crate::types::{Fault, TransportState};
use crate::volume::Volume;
use serde::Serialize;
use simple_audio_core::{Playlist, Track, TrackIndex};

/// Everything the panel needs to draw the now-playing card, seek bar and
/// transport row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Index of the current track
    pub current: TrackIndex,
    /// Playlist entry for `current`, enriched once it has been loaded
    pub now_playing: Option<Track>,
    /// Transport state
    pub state: TransportState,
    /// Whether the device is meant to be playing
    pub playing: bool,
    /// Elapsed seconds
    pub position_secs: f64,
    /// Track length in seconds, once the device has reported it
    pub duration_secs: Option<f64>,
    /// Duration known and usable
    pub ready: bool,
    /// Fault that put the session in error
    pub error: Option<Fault>,
    /// Whether the seek slider accepts input
    pub can_seek: bool,
    /// A track exists before `current`
    pub has_previous: bool,
    /// A track exists after `current`
    pub has_next: bool,
    /// Linear volume (0.0 - 1.0)
    pub volume: f64,
    /// Volume as a slider percentage (0 - 100)
    pub volume_percent: u8,
    /// Repeat the current track on end
    pub repeat: bool,
    /// Number of playlist entries
    pub track_count: usize,
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &PlaybackSession, playlist: &Playlist) -> Self {
        let current = session.current();
        Self {
            current,
            now_playing: playlist.get(current).cloned(),
            state: session.state(),
            playing: session.is_playing(),
            position_secs: session.position(),
            duration_secs: session.duration(),
            ready: session.is_ready(),
            error: session.fault(),
            can_seek: session.can_seek(),
            has_previous: playlist.has_previous(current),
            has_next: playlist.has_next(current),
            volume: session.volume(),
            volume_percent: Volume::new(session.volume()).percent(),
            repeat: session.repeat(),
            track_count: playlist.len(),
        }
    }

    /// Whether the error affordance should be shown
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Upper bound for the seek slider (1.0 while not ready)
    pub fn slider_max(&self) -> f64 {
        match self.duration_secs {
            Some(duration) if self.ready => duration,
            _ => 1.0,
        }
    }

    /// Elapsed time label
    pub fn elapsed_label(&self) -> String {
        format_time(self.position_secs)
    }

    /// Total time label
    pub fn duration_label(&self) -> String {
        format_time(self.duration_secs.unwrap_or(0.0))
    }
}

/// Format seconds as `mm:ss`
///
/// Minutes are not wrapped into hours; negative or non-finite input shows
/// as `00:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "00:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
