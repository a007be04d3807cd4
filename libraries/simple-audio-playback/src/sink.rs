//! Media sink trait and signal subscription
//!
//! Abstracts the device audio element. The sink is a process-wide resource
//! that outlives any single controller: it keeps playing while the panel is
//! closed, and a controller created on reopen attaches to it again.

use async_trait::async_trait;
use simple_audio_core::TrackIndex;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

/// Signals emitted by the media sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Duration became known for the loaded source
    MetadataReady {
        /// Duration in seconds (may be non-finite for streams)
        duration: f64,
    },

    /// Playback position moved (periodic, not a fixed interval)
    PositionAdvanced {
        /// Position in seconds
        position: f64,
    },

    /// Playback reached the end of the media
    Ended,

    /// Decode or load failure
    Error {
        /// Device-provided description
        message: String,
    },
}

/// Failure starting playback
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// Device declined to start (autoplay policy, no user gesture, nothing
    /// loaded)
    #[error("play request rejected: {0}")]
    Rejected(String),
}

/// Channel end the sink pushes signals into
pub type SinkListener = mpsc::UnboundedSender<SinkEvent>;

/// Handle identifying one listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Device audio output
///
/// Property setters take `&self`: the sink is shared through an `Arc` and
/// uses interior mutability. Only the attached controller mutates source,
/// volume and transport; other holders may read.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Currently assigned source, if any
    fn source(&self) -> Option<String>;

    /// Assign a new source
    ///
    /// Position and duration belong to the new source afterwards.
    fn set_source(&self, source: &str);

    /// Begin loading the assigned source
    fn load(&self) {}

    /// Playlist index the assigned source was resolved from
    ///
    /// Lives with the sink so a controller attaching to an already loaded
    /// sink shows the track that is actually playing. Sinks that cannot
    /// store it report `None`.
    fn loaded_track(&self) -> Option<TrackIndex> {
        None
    }

    /// Record the playlist index of the assigned source
    fn set_loaded_track(&self, _index: TrackIndex) {}

    /// Output volume (0.0 - 1.0)
    fn volume(&self) -> f64;

    /// Set output volume (0.0 - 1.0)
    fn set_volume(&self, volume: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Move the playhead
    fn set_position(&self, position: f64);

    /// Duration in seconds, once known
    fn duration(&self) -> Option<f64>;

    /// Whether the device is paused (or has nothing to play)
    fn is_paused(&self) -> bool;

    /// Request playback start; the device may refuse
    async fn play(&self) -> Result<(), SinkError>;

    /// Pause playback
    fn pause(&self);

    /// Register a listener for sink signals
    fn subscribe(&self, listener: SinkListener) -> SubscriptionId;

    /// Remove a listener
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Listener registration that unsubscribes when dropped
///
/// Guarantees a torn-down controller never leaves a listener attached to the
/// long-lived sink.
pub struct Subscription {
    sink: Arc<dyn MediaSink>,
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe `listener` to `sink`
    pub fn new(sink: Arc<dyn MediaSink>, listener: SinkListener) -> Self {
        let id = sink.subscribe(listener);
        Self { sink, id }
    }

    /// Registration handle
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.sink.unsubscribe(self.id);
        tracing::debug!(subscription = self.id.0, "Unsubscribed from media sink");
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Listener bookkeeping for sink implementations
///
/// Fans events out to every registered listener and forgets listeners whose
/// receiving side has gone away.
#[derive(Debug, Default)]
pub struct SinkListeners {
    inner: Mutex<ListenerTable>,
}

#[derive(Debug, Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(SubscriptionId, SinkListener)>,
}

impl SinkListeners {
    /// Create an empty listener table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&self, listener: SinkListener) -> SubscriptionId {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(table.next_id);
        table.next_id += 1;
        table.entries.push((id, listener));
        id
    }

    /// Remove a listener (no-op if unknown)
    pub fn remove(&self, id: SubscriptionId) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table.entries.retain(|(entry, _)| *entry != id);
    }

    /// Deliver an event to every live listener
    pub fn emit(&self, event: &SinkEvent) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entries
            .retain(|(_, listener)| listener.send(event.clone()).is_ok());
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
