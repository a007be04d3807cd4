//! Playback controller - session orchestration
//!
//! Coordinates the host's track provider, the device media sink, and the
//! session state the panel renders from.

use crate::{
    error::{PlaybackError, Result},
    events::{EventQueue, PlaybackEvent},
    generation::{Generation, RequestToken},
    seek::SeekGuard,
    session::PlaybackSession,
    sink::{MediaSink, SinkEvent, Subscription},
    snapshot::SessionSnapshot,
    types::{ControllerConfig, Fault},
    volume,
};
use simple_audio_core::{MediaRef, Playlist, Track, TrackIndex, TrackProvider};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How a resolved track is handed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// Assign the source, stay paused
    Silent,
    /// Assign the source and start playback
    Play,
}

/// What a track-end signal turns into
enum EndAction {
    Restart(RequestToken),
    Advance(TrackIndex),
    Stop,
}

/// What a play/pause tap turns into
enum ToggleAction {
    Load(TrackIndex),
    Resume(RequestToken),
    Nothing,
}

/// Mutable controller state, guarded by one mutex
///
/// The guard is never held across an `.await`.
struct Inner {
    session: PlaybackSession,
    playlist: Playlist,
    enriched: HashSet<TrackIndex>,
    generation: Generation,
    /// Target of the newest in-flight load
    pending: Option<(TrackIndex, LoadMode)>,
    seek: SeekGuard,
    events: EventQueue,
}

impl Inner {
    /// Apply a transition and queue a state event if the state moved
    fn transition(&mut self, apply: impl FnOnce(&mut PlaybackSession)) {
        let before = self.session.state();
        apply(&mut self.session);
        let after = self.session.state();
        if before != after {
            self.events
                .push(PlaybackEvent::StateChanged { state: after });
        }
    }

    /// Queue a track event if the current index moved away from `previous`
    fn track_changed(&mut self, previous: TrackIndex) {
        let index = self.session.current();
        if index != previous {
            self.events
                .push(PlaybackEvent::TrackChanged { index, previous });
        }
    }

    fn fail(&mut self, fault: Fault, message: String) {
        warn!(current = self.session.current(), ?fault, %message, "Playback session entered error state");
        self.transition(|s| s.fail(fault));
        self.events.push(PlaybackEvent::Error { fault, message });
    }

    /// Index and mode the next transport tap should be relative to
    ///
    /// While a load is in flight its target counts as current, so rapid
    /// repeated taps keep moving forward instead of re-requesting the same
    /// track.
    fn effective_position(&self) -> (TrackIndex, bool) {
        match self.pending {
            Some((index, mode)) => (index, mode == LoadMode::Play),
            None => (self.session.current(), self.session.is_playing()),
        }
    }
}

/// Playback-session controller
///
/// Owns the playlist and the transport state and is the only mutator of the
/// shared media sink while attached. All operations take `&self` and may be
/// interleaved by the host's event loop; results of asynchronous calls that
/// were superseded by a newer request are discarded.
pub struct PlaybackController {
    provider: Arc<dyn TrackProvider>,
    sink: Arc<dyn MediaSink>,
    config: ControllerConfig,
    inner: Mutex<Inner>,
    signals: Mutex<mpsc::UnboundedReceiver<SinkEvent>>,
    subscription: Subscription,
}

impl PlaybackController {
    /// Attach to the provider and the (possibly already playing) sink
    ///
    /// Fetches playlist, initial track, volume and repeat flag concurrently.
    /// Only a failed playlist fetch aborts; the others fall back to defaults.
    /// A sink that already holds a source is mirrored, never reset.
    pub async fn attach(
        provider: Arc<dyn TrackProvider>,
        sink: Arc<dyn MediaSink>,
        config: ControllerConfig,
    ) -> Result<Self> {
        let (tracks, initial, persisted_volume, persisted_repeat) = tokio::join!(
            provider.get_playlist(),
            provider.get_initial_track(),
            provider.get_volume(),
            provider.get_repeat(),
        );

        let playlist = Playlist::new(tracks?);

        let mut current = initial.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch initial track, starting at the top");
            0
        });
        if !playlist.contains(current) {
            if !playlist.is_empty() {
                warn!(current, len = playlist.len(), "Initial track out of range, starting at the top");
            }
            current = 0;
        }

        let fallback_volume = volume::normalize(config.fallback_volume).unwrap_or(1.0);
        let level = match persisted_volume {
            Ok(level) => volume::normalize(level).unwrap_or(fallback_volume),
            Err(e) => {
                warn!(error = %e, "Failed to fetch volume, using fallback");
                fallback_volume
            }
        };

        let repeat = persisted_repeat.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch repeat flag, defaulting to off");
            false
        });

        let (listener, signals) = mpsc::unbounded_channel();
        let subscription = Subscription::new(Arc::clone(&sink), listener);

        sink.set_volume(level);

        let resumed = sink.source().is_some();
        if resumed {
            // The sink knows what it is playing; persisted state may lag
            if let Some(loaded) = sink.loaded_track().filter(|i| playlist.contains(*i)) {
                current = loaded;
            }
        }
        let session = if resumed {
            PlaybackSession::resumed(
                current,
                level,
                repeat,
                sink.is_paused(),
                sink.position(),
                sink.duration(),
            )
        } else {
            PlaybackSession::new(current, level, repeat)
        };

        info!(
            tracks = playlist.len(),
            current,
            volume = level,
            repeat,
            resumed,
            "Playback controller attached"
        );

        let preload = config.preload_on_attach && !resumed && !playlist.is_empty();
        let seek = SeekGuard::new(config.seek_guard_margin_secs, config.seek_cooldown());

        let controller = Self {
            provider,
            sink,
            config,
            inner: Mutex::new(Inner {
                session,
                playlist,
                enriched: HashSet::new(),
                generation: Generation::new(),
                pending: None,
                seek,
                events: EventQueue::default(),
            }),
            signals: Mutex::new(signals),
            subscription,
        };

        if preload {
            if let Err(e) = controller.load_silently(current).await {
                warn!(current, error = %e, "Failed to preload initial track");
            }
        }

        Ok(controller)
    }

    /// Tear down, releasing the sink subscription
    ///
    /// The sink keeps its source and transport state so a later `attach`
    /// picks up where this one left off.
    pub fn detach(self) {
        info!(subscription = self.subscription.id().0, "Playback controller detached");
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Track loading =====

    /// Resolve and load a track without starting playback
    pub async fn load_silently(&self, index: TrackIndex) -> Result<()> {
        self.load(index, LoadMode::Silent).await
    }

    /// Resolve, load and play a track
    ///
    /// On failure the session is in the error state and `current` is left
    /// where it was before the call.
    pub async fn play_track(&self, index: TrackIndex) -> Result<()> {
        self.load(index, LoadMode::Play).await
    }

    /// Playlist-browser selection
    pub async fn select_track(&self, index: TrackIndex) -> Result<()> {
        self.play_track(index).await
    }

    async fn load(&self, index: TrackIndex, mode: LoadMode) -> Result<()> {
        let token = {
            let mut inner = self.lock();
            if !inner.playlist.contains(index) {
                return Err(PlaybackError::IndexOutOfBounds(index));
            }
            let token = inner.generation.advance();
            inner.pending = Some((index, mode));
            inner.seek.reset();
            inner.transition(PlaybackSession::begin_load);
            token
        };

        debug!(index, ?mode, generation = token.value(), "Resolving track");
        let resolved = self.provider.load_track(index).await;

        {
            let mut inner = self.lock();
            if !inner.generation.is_current(token) {
                debug!(index, generation = token.value(), "Discarding superseded track resolution");
                return Ok(());
            }

            let mut track = match resolved {
                Ok(track) => track,
                Err(e) => {
                    inner.pending = None;
                    self.sink.pause();
                    inner.fail(Fault::UnresolvableTrack, e.to_string());
                    return Err(e.into());
                }
            };

            let source = track
                .media
                .take()
                .filter(|media| !media.is_empty())
                .as_ref()
                .map(MediaRef::to_source);
            track.index = index;
            if inner.playlist.enrich(track) {
                inner.events.push(PlaybackEvent::TrackEnriched { index });
            }

            let Some(source) = source else {
                inner.pending = None;
                self.sink.pause();
                inner.fail(
                    Fault::UnresolvableTrack,
                    format!("track {index} has no playable media"),
                );
                return Err(PlaybackError::UnresolvableTrack(index));
            };

            self.discard_stale_signals();
            if mode == LoadMode::Silent {
                self.sink.pause();
            }
            self.sink.set_source(&source);
            self.sink.set_loaded_track(index);
            self.sink.load();
            inner.session.source_assigned();

            let provider = Arc::clone(&self.provider);
            persist_in_background("last track", async move {
                provider.set_initial_track(index).await
            });

            if mode == LoadMode::Silent {
                inner.pending = None;
                let previous = inner.session.current();
                inner.transition(|s| s.loaded_paused(index));
                inner.track_changed(previous);
                info!(index, "Track loaded");
                return Ok(());
            }
        }

        let started = self.sink.play().await;

        let mut inner = self.lock();
        if !inner.generation.is_current(token) {
            debug!(index, generation = token.value(), "Discarding superseded play request");
            return Ok(());
        }
        inner.pending = None;
        match started {
            Ok(()) => {
                let previous = inner.session.current();
                inner.transition(|s| s.playing(index));
                inner.track_changed(previous);
                info!(index, "Playback started");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                inner.fail(Fault::PlaybackRejected, message.clone());
                Err(PlaybackError::PlaybackRejected(message))
            }
        }
    }

    /// Drop queued sink signals; they belong to the source being replaced
    fn discard_stale_signals(&self) {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let mut dropped = 0usize;
        while signals.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded sink signals from previous source");
        }
    }

    // ===== Transport =====

    /// Play/pause button
    ///
    /// With nothing loaded (or the current track in error) this (re)loads the
    /// current track and plays it; otherwise it flips the device.
    pub async fn toggle_play(&self) -> Result<()> {
        let action = {
            let mut inner = self.lock();
            if inner.playlist.is_empty() {
                ToggleAction::Nothing
            } else if inner.session.is_loading() {
                debug!("Ignoring play/pause while a track is loading");
                ToggleAction::Nothing
            } else if self.sink.source().is_none() || inner.session.is_error() {
                ToggleAction::Load(inner.session.current())
            } else if self.sink.is_paused() {
                ToggleAction::Resume(inner.generation.current())
            } else {
                self.sink.pause();
                inner.transition(PlaybackSession::paused);
                debug!(current = inner.session.current(), "Paused");
                ToggleAction::Nothing
            }
        };

        match action {
            ToggleAction::Load(index) => self.play_track(index).await,
            ToggleAction::Resume(token) => self.resume(token).await,
            ToggleAction::Nothing => Ok(()),
        }
    }

    async fn resume(&self, token: RequestToken) -> Result<()> {
        let started = self.sink.play().await;

        let mut inner = self.lock();
        if !inner.generation.is_current(token) {
            debug!(generation = token.value(), "Discarding superseded resume");
            return Ok(());
        }
        match started {
            Ok(()) => {
                let current = inner.session.current();
                inner.transition(|s| s.playing(current));
                debug!(current, "Resumed");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                inner.fail(Fault::PlaybackRejected, message.clone());
                Err(PlaybackError::PlaybackRejected(message))
            }
        }
    }

    /// Next button
    pub async fn next(&self) -> Result<()> {
        let (target, playing) = {
            let inner = self.lock();
            let (base, playing) = inner.effective_position();
            if !inner.playlist.has_next(base) {
                return Err(PlaybackError::NoNextTrack);
            }
            (base + 1, playing)
        };
        self.step_to(target, playing).await
    }

    /// Previous button
    pub async fn previous(&self) -> Result<()> {
        let (target, playing) = {
            let inner = self.lock();
            let (base, playing) = inner.effective_position();
            if !inner.playlist.has_previous(base) {
                return Err(PlaybackError::NoPreviousTrack);
            }
            (base - 1, playing)
        };
        self.step_to(target, playing).await
    }

    async fn step_to(&self, target: TrackIndex, playing: bool) -> Result<()> {
        if playing {
            self.play_track(target).await
        } else {
            self.load_silently(target).await
        }
    }

    /// Seek slider
    ///
    /// Returns `false` when the request was ignored because the track is not
    /// ready (or is in error). Ignored requests are dropped, not queued.
    pub fn seek(&self, value: f64) -> bool {
        let mut inner = self.lock();
        if !inner.session.can_seek() {
            debug!(value, "Ignoring seek: track not ready");
            return false;
        }
        let Some(duration) = inner.session.duration() else {
            return false;
        };
        let Some(target) = inner.seek.clamp(value, duration) else {
            debug!("Ignoring seek to NaN");
            return false;
        };

        self.sink.set_position(target);
        inner.session.set_position(target);
        inner.seek.arm(Instant::now());
        inner.events.push(PlaybackEvent::PositionUpdate {
            position_secs: target,
            duration_secs: Some(duration),
        });
        debug!(requested = value, target, "Seek");
        true
    }

    /// Volume slider
    ///
    /// Clamps into 0.0 - 1.0, applies to the device immediately and persists
    /// in the background. Returns the applied level.
    pub fn set_volume(&self, value: f64) -> f64 {
        let Some(level) = volume::normalize(value) else {
            warn!("Ignoring NaN volume");
            return self.lock().session.volume();
        };

        {
            let mut inner = self.lock();
            self.sink.set_volume(level);
            inner.session.set_volume(level);
            inner.events.push(PlaybackEvent::VolumeChanged { level });
        }

        let provider = Arc::clone(&self.provider);
        persist_in_background("volume", async move { provider.set_volume(level).await });
        level
    }

    /// Repeat toggle; returns the new flag
    pub fn toggle_repeat(&self) -> bool {
        let enabled = {
            let mut inner = self.lock();
            let enabled = inner.session.toggle_repeat();
            inner.events.push(PlaybackEvent::RepeatChanged { enabled });
            enabled
        };
        debug!(enabled, "Repeat toggled");

        let provider = Arc::clone(&self.provider);
        persist_in_background("repeat", async move { provider.set_repeat(enabled).await });
        enabled
    }

    // ===== Sink signals =====

    /// Handle every sink signal queued so far; returns how many were taken
    ///
    /// Signals are taken one at a time so that a track change triggered by
    /// one of them discards the rest of the old source's backlog.
    pub async fn process_pending_events(&self) -> usize {
        let mut handled = 0;
        loop {
            let next = {
                let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
                signals.try_recv().ok()
            };
            let Some(event) = next else {
                break;
            };
            handled += 1;
            if let Err(e) = self.handle_sink_event(event).await {
                debug!(error = %e, "Sink signal left the session in error");
            }
        }
        handled
    }

    /// Handle one sink signal
    pub async fn handle_sink_event(&self, event: SinkEvent) -> Result<()> {
        let action = {
            let mut inner = self.lock();
            if inner.session.is_awaiting_source() {
                debug!(?event, "Ignoring sink signal for previous source");
                return Ok(());
            }

            match event {
                SinkEvent::MetadataReady { duration } => {
                    if inner.session.mark_ready(duration) {
                        inner.events.push(PlaybackEvent::Ready {
                            duration_secs: duration,
                        });
                        debug!(duration, "Track ready");
                    } else {
                        debug!(duration, "Sink reported unusable duration");
                    }
                    return Ok(());
                }
                SinkEvent::PositionAdvanced { position } => {
                    if !inner.seek.is_suppressing(Instant::now()) {
                        inner.session.set_position(position);
                        let position_secs = inner.session.position();
                        let duration_secs = inner.session.duration();
                        inner.events.push(PlaybackEvent::PositionUpdate {
                            position_secs,
                            duration_secs,
                        });
                    }
                    return Ok(());
                }
                SinkEvent::Error { message } => {
                    // A play or resume still awaiting the device must not
                    // clear this fault when it completes
                    inner.generation.advance();
                    inner.pending = None;
                    inner.fail(Fault::DeviceError, message.clone());
                    return Err(PlaybackError::Device(message));
                }
                SinkEvent::Ended => {
                    if inner.session.is_error() {
                        return Ok(());
                    }
                    Self::end_of_track(&mut inner, self.sink.as_ref())
                }
            }
        };

        match action {
            EndAction::Restart(token) => self.resume(token).await,
            EndAction::Advance(index) => self.play_track(index).await,
            EndAction::Stop => Ok(()),
        }
    }

    fn end_of_track(inner: &mut Inner, sink: &dyn MediaSink) -> EndAction {
        let current = inner.session.current();
        if inner.session.repeat() {
            debug!(current, "Track ended, repeating");
            sink.set_position(0.0);
            inner.seek.reset();
            inner.session.set_position(0.0);
            EndAction::Restart(inner.generation.current())
        } else if inner.playlist.has_next(current) {
            debug!(current, "Track ended, advancing");
            inner.session.select(current + 1);
            inner.track_changed(current);
            EndAction::Advance(current + 1)
        } else {
            info!(current, "Reached end of playlist");
            inner.transition(PlaybackSession::ended);
            EndAction::Stop
        }
    }

    // ===== Metadata =====

    /// Full tags for a track (metadata modal)
    ///
    /// Fetched from the provider once per index and merged into the playlist.
    pub async fn track_metadata(&self, index: TrackIndex) -> Result<Track> {
        {
            let inner = self.lock();
            let Some(track) = inner.playlist.get(index) else {
                return Err(PlaybackError::IndexOutOfBounds(index));
            };
            if inner.enriched.contains(&index) {
                return Ok(track.clone());
            }
        }

        let mut tagged = self.provider.get_track_metadata(index).await?;
        tagged.index = index;
        tagged.media = None;

        let mut inner = self.lock();
        inner.playlist.enrich(tagged);
        inner.enriched.insert(index);
        inner.events.push(PlaybackEvent::TrackEnriched { index });
        inner
            .playlist
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))
    }

    // ===== Queries =====

    /// Render-ready view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot::capture(&inner.session, &inner.playlist)
    }

    /// Copy of the session state
    pub fn session(&self) -> PlaybackSession {
        self.lock().session.clone()
    }

    /// Copy of the playlist (playlist browser)
    pub fn playlist(&self) -> Playlist {
        self.lock().playlist.clone()
    }

    /// One playlist entry
    pub fn track(&self, index: TrackIndex) -> Option<Track> {
        self.lock().playlist.get(index).cloned()
    }

    /// Drain queued UI events
    pub fn take_events(&self) -> Vec<PlaybackEvent> {
        self.lock().events.drain()
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The shared sink this controller drives
    pub fn sink(&self) -> Arc<dyn MediaSink> {
        Arc::clone(&self.sink)
    }
}

/// Fire-and-forget persistence; failures are logged, never surfaced
fn persist_in_background<F>(what: &'static str, persist: F)
where
    F: Future<Output = simple_audio_core::Result<()>> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = persist.await {
                    warn!(what, error = %e, "Failed to persist setting");
                }
            });
        }
        Err(_) => warn!(what, "No async runtime available, setting not persisted"),
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("PlaybackController")
            .field("session", &inner.session)
            .field("tracks", &inner.playlist.len())
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}
