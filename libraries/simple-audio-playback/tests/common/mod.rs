//! Shared test doubles for playback controller tests
//!
//! `FakeSink` behaves like a browser audio element: assigning a source resets
//! position and duration, the element starts paused, and `play` can be made
//! to fail the way an autoplay policy would. `FakeProvider` serves a fixed
//! playlist and can hold individual `load_track` calls open to simulate a slow
//! host.

#![allow(dead_code)]

use async_trait::async_trait;
use simple_audio_core::{CoreError, MediaRef, Track, TrackIndex, TrackProvider};
use simple_audio_playback::{
    ControllerConfig, MediaSink, PlaybackController, SinkError, SinkEvent, SinkListener,
    SinkListeners, SubscriptionId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

// ===== Sink =====

#[derive(Debug)]
pub struct SinkState {
    pub source: Option<String>,
    pub volume: f64,
    pub position: f64,
    pub duration: Option<f64>,
    pub paused: bool,
    pub reject_play: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub sources: Vec<String>,
    pub seeks: Vec<f64>,
    pub loaded_track: Option<TrackIndex>,
}

impl Default for SinkState {
    fn default() -> Self {
        Self {
            source: None,
            volume: 1.0,
            position: 0.0,
            duration: None,
            paused: true,
            reject_play: false,
            play_calls: 0,
            pause_calls: 0,
            sources: Vec::new(),
            seeks: Vec::new(),
            loaded_track: None,
        }
    }
}

#[derive(Default)]
pub struct FakeSink {
    state: Mutex<SinkState>,
    listeners: SinkListeners,
    play_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap()
    }

    pub fn reject_play(&self, reject: bool) {
        self.state().reject_play = reject;
    }

    /// Hold the next `play` call open until the returned handle is notified
    pub fn gate_play(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.play_gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Duration became known
    pub fn report_duration(&self, duration: f64) {
        self.state().duration = Some(duration);
        self.listeners.emit(&SinkEvent::MetadataReady { duration });
    }

    /// Periodic progress
    pub fn advance_to(&self, position: f64) {
        self.state().position = position;
        self.listeners.emit(&SinkEvent::PositionAdvanced { position });
    }

    /// Media ran out
    pub fn finish(&self) {
        {
            let mut state = self.state();
            state.paused = true;
            let duration = state.duration;
            if let Some(duration) = duration {
                state.position = duration;
            }
        }
        self.listeners.emit(&SinkEvent::Ended);
    }

    /// Decode failure
    pub fn fail(&self, message: &str) {
        self.state().paused = true;
        self.listeners.emit(&SinkEvent::Error {
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl MediaSink for FakeSink {
    fn source(&self) -> Option<String> {
        self.state().source.clone()
    }

    fn set_source(&self, source: &str) {
        let mut state = self.state();
        state.source = Some(source.to_string());
        state.sources.push(source.to_string());
        state.position = 0.0;
        state.duration = None;
    }

    fn loaded_track(&self) -> Option<TrackIndex> {
        self.state().loaded_track
    }

    fn set_loaded_track(&self, index: TrackIndex) {
        self.state().loaded_track = Some(index);
    }

    fn volume(&self) -> f64 {
        self.state().volume
    }

    fn set_volume(&self, volume: f64) {
        self.state().volume = volume;
    }

    fn position(&self) -> f64 {
        self.state().position
    }

    fn set_position(&self, position: f64) {
        let mut state = self.state();
        state.position = position;
        state.seeks.push(position);
    }

    fn duration(&self) -> Option<f64> {
        self.state().duration
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    async fn play(&self) -> Result<(), SinkError> {
        let gate = self.play_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state();
        state.play_calls += 1;
        if state.reject_play {
            return Err(SinkError::Rejected("autoplay blocked".to_string()));
        }
        if state.source.is_none() {
            return Err(SinkError::Rejected("no source loaded".to_string()));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state();
        state.paused = true;
        state.pause_calls += 1;
    }

    fn subscribe(&self, listener: SinkListener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}

// ===== Provider =====

pub struct FakeProvider {
    tracks: Vec<Track>,
    unresolvable: HashSet<TrackIndex>,
    /// Last applied track, as persisted by the controller
    initial: Mutex<TrackIndex>,
    volume: Mutex<f64>,
    repeat: Mutex<bool>,
    fail_settings: bool,
    gates: Mutex<HashMap<TrackIndex, Arc<Notify>>>,
    pub load_calls: Mutex<Vec<TrackIndex>>,
    pub metadata_calls: Mutex<Vec<TrackIndex>>,
    pub volume_writes: Mutex<Vec<f64>>,
    pub repeat_writes: Mutex<Vec<bool>>,
    pub initial_writes: Mutex<Vec<TrackIndex>>,
}

impl FakeProvider {
    pub fn with_titles(titles: &[&str]) -> Self {
        let tracks = titles
            .iter()
            .enumerate()
            .map(|(index, title)| Track::new(index, *title))
            .collect();
        Self {
            tracks,
            unresolvable: HashSet::new(),
            initial: Mutex::new(0),
            volume: Mutex::new(1.0),
            repeat: Mutex::new(false),
            fail_settings: false,
            gates: Mutex::new(HashMap::new()),
            load_calls: Mutex::new(Vec::new()),
            metadata_calls: Mutex::new(Vec::new()),
            volume_writes: Mutex::new(Vec::new()),
            repeat_writes: Mutex::new(Vec::new()),
            initial_writes: Mutex::new(Vec::new()),
        }
    }

    pub fn unresolvable(mut self, index: TrackIndex) -> Self {
        self.unresolvable.insert(index);
        self
    }

    pub fn initial(self, index: TrackIndex) -> Self {
        *self.initial.lock().unwrap() = index;
        self
    }

    pub fn volume(self, volume: f64) -> Self {
        *self.volume.lock().unwrap() = volume;
        self
    }

    pub fn repeat(self, repeat: bool) -> Self {
        *self.repeat.lock().unwrap() = repeat;
        self
    }

    /// Make every settings fetch/persist call fail
    pub fn failing_settings(mut self) -> Self {
        self.fail_settings = true;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Hold `load_track(index)` open until the returned handle is notified
    pub fn gate(&self, index: TrackIndex) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(index, Arc::clone(&notify));
        notify
    }

    pub fn source_for(&self, index: TrackIndex) -> String {
        format!("file:///music/{}.mp3", self.tracks[index].title)
    }

    pub fn loads(&self) -> Vec<TrackIndex> {
        self.load_calls.lock().unwrap().clone()
    }

    fn settings_error(&self) -> Option<CoreError> {
        self.fail_settings
            .then(|| CoreError::provider("settings backend unavailable"))
    }
}

#[async_trait]
impl TrackProvider for FakeProvider {
    async fn get_playlist(&self) -> simple_audio_core::Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }

    async fn load_track(&self, index: TrackIndex) -> simple_audio_core::Result<Track> {
        self.load_calls.lock().unwrap().push(index);

        let gate = self.gates.lock().unwrap().get(&index).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut track = self
            .tracks
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::out_of_range(index, self.tracks.len()))?;
        if !self.unresolvable.contains(&index) {
            track.media = Some(MediaRef::url(self.source_for(index)));
        }
        Ok(track)
    }

    async fn get_track_metadata(&self, index: TrackIndex) -> simple_audio_core::Result<Track> {
        self.metadata_calls.lock().unwrap().push(index);
        let mut track = self
            .tracks
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::out_of_range(index, self.tracks.len()))?;
        track.artist = Some(format!("Artist {index}"));
        track.duration_ms = Some(180_000);
        Ok(track)
    }

    async fn get_initial_track(&self) -> simple_audio_core::Result<TrackIndex> {
        Ok(*self.initial.lock().unwrap())
    }

    async fn set_initial_track(&self, index: TrackIndex) -> simple_audio_core::Result<()> {
        self.initial_writes.lock().unwrap().push(index);
        *self.initial.lock().unwrap() = index;
        Ok(())
    }

    async fn get_volume(&self) -> simple_audio_core::Result<f64> {
        match self.settings_error() {
            Some(e) => Err(e),
            None => Ok(*self.volume.lock().unwrap()),
        }
    }

    async fn set_volume(&self, volume: f64) -> simple_audio_core::Result<()> {
        self.volume_writes.lock().unwrap().push(volume);
        match self.settings_error() {
            Some(e) => Err(e),
            None => {
                *self.volume.lock().unwrap() = volume;
                Ok(())
            }
        }
    }

    async fn get_repeat(&self) -> simple_audio_core::Result<bool> {
        match self.settings_error() {
            Some(e) => Err(e),
            None => Ok(*self.repeat.lock().unwrap()),
        }
    }

    async fn set_repeat(&self, repeat: bool) -> simple_audio_core::Result<()> {
        self.repeat_writes.lock().unwrap().push(repeat);
        match self.settings_error() {
            Some(e) => Err(e),
            None => {
                *self.repeat.lock().unwrap() = repeat;
                Ok(())
            }
        }
    }
}

// ===== Helpers =====

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("simple_audio_playback=debug")
        .try_init();
}

pub async fn attach(provider: &Arc<FakeProvider>, sink: &Arc<FakeSink>) -> PlaybackController {
    attach_with(provider, sink, ControllerConfig::default()).await
}

pub async fn attach_with(
    provider: &Arc<FakeProvider>,
    sink: &Arc<FakeSink>,
    config: ControllerConfig,
) -> PlaybackController {
    init_tracing();
    PlaybackController::attach(provider.clone(), sink.clone(), config)
        .await
        .expect("attach should succeed")
}

/// Let background persistence tasks run
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
