//! SimpleAudio - Playback Session Control
//!
//! The playback-session state machine behind the SimpleAudio panel.
//!
//! This crate provides:
//! - Track loading in two modes (silent preload, load-and-play)
//! - Transport (play/pause, next/previous, seek, volume, repeat)
//! - Track-end policy (repeat, advance, stop at end of list)
//! - Seek clamping with position-feedback suppression
//! - Superseding of stale asynchronous results via request generations
//! - Reattachment to a sink that kept playing while the panel was closed
//!
//! # Architecture
//!
//! `simple-audio-playback` knows nothing about the UI toolkit or the host's
//! remote-call transport:
//! - The device audio element is a [`MediaSink`]
//! - The host backend is a [`TrackProvider`](simple_audio_core::TrackProvider)
//! - The panel reads a [`SessionSnapshot`] and drains [`PlaybackEvent`]s
//!
//! # Example
//!
//! ```rust,no_run
//! use simple_audio_playback::{ControllerConfig, MediaSink, PlaybackController};
//! use simple_audio_core::TrackProvider;
//! use std::sync::Arc;
//!
//! # async fn panel(provider: Arc<dyn TrackProvider>, sink: Arc<dyn MediaSink>) -> simple_audio_playback::Result<()> {
//! // The sink outlives the panel; the controller is created on every open
//! let controller = PlaybackController::attach(provider, sink, ControllerConfig::default()).await?;
//!
//! controller.toggle_play().await?;
//! controller.seek(42.0);
//! controller.set_volume(0.6);
//!
//! // Host event loop: forward device signals, then re-render
//! controller.process_pending_events().await;
//! let snapshot = controller.snapshot();
//! println!("{} / {}", snapshot.elapsed_label(), snapshot.duration_label());
//!
//! // Panel closed: audio keeps playing
//! controller.detach();
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod events;
mod generation;
mod seek;
mod session;
mod sink;
mod snapshot;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use generation::{Generation, RequestToken};
pub use seek::SeekGuard;
pub use session::PlaybackSession;
pub use sink::{MediaSink, SinkError, SinkEvent, SinkListener, SinkListeners, Subscription, SubscriptionId};
pub use snapshot::{format_time, SessionSnapshot};
pub use types::{ControllerConfig, Fault, TransportState};
pub use volume::Volume;
