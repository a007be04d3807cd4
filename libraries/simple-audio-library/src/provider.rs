//! Filesystem-backed track provider

use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::metadata::{file_title, TagReader};
use crate::scanner::{self, LibraryScanner};
use crate::state::StateStore;
use async_trait::async_trait;
use simple_audio_core::{CoreError, MediaRef, Track, TrackIndex, TrackProvider};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Track provider serving a scanned music directory
///
/// The playlist is fixed at open time. Tracks are served whole as base64
/// payloads; tags are only read on demand.
#[derive(Debug)]
pub struct LibraryProvider {
    tracks: Vec<Track>,
    state: StateStore,
    reader: TagReader,
}

impl LibraryProvider {
    /// Validate the configuration, scan the music directory and load the
    /// persisted session state
    pub async fn open(config: &LibraryConfig) -> Result<Self> {
        config.validate()?;

        let music_dir = config.music_dir();
        let mut scanner = LibraryScanner::new().follow_links(config.follow_links);
        if let Some(depth) = config.max_depth {
            scanner = scanner.max_depth(depth);
        }

        let tracks = tokio::task::spawn_blocking(move || -> Result<Vec<Track>> {
            let files = scanner.scan(&music_dir)?;
            Ok(files.into_iter().enumerate().map(entry).collect())
        })
        .await
        .map_err(|e| LibraryError::Task(e.to_string()))??;

        let state = StateStore::open(config.state_file()).await;

        info!(tracks = tracks.len(), state = %state.path().display(), "Library opened");

        Ok(Self {
            tracks,
            state,
            reader: TagReader::new(),
        })
    }

    /// Number of tracks in the library
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn path_of(&self, index: TrackIndex) -> Result<PathBuf> {
        self.tracks
            .get(index)
            .and_then(|track| track.path.clone())
            .ok_or(LibraryError::OutOfRange {
                index,
                len: self.tracks.len(),
            })
    }

}

/// Lightweight playlist entry for a scanned file
fn entry((index, path): (TrackIndex, PathBuf)) -> Track {
    let mut track = Track::new(index, file_title(&path));
    track.size_bytes = std::fs::metadata(&path).ok().map(|m| m.len());
    track.path = Some(path);
    track
}

#[async_trait]
impl TrackProvider for LibraryProvider {
    async fn get_playlist(&self) -> simple_audio_core::Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }

    async fn load_track(&self, index: TrackIndex) -> simple_audio_core::Result<Track> {
        let path = self.path_of(index)?;
        info!(index, path = %path.display(), "Loading track");

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            warn!(index, path = %path.display(), error = %e, "Failed to read track");
            CoreError::from(e)
        })?;

        let mut track = self.tracks[index].clone();
        track.size_bytes = Some(bytes.len() as u64);
        track.media = Some(MediaRef::payload(&bytes, scanner::mime_type(&path)));
        Ok(track)
    }

    async fn get_track_metadata(&self, index: TrackIndex) -> simple_audio_core::Result<Track> {
        let path = self.path_of(index)?;
        let reader = self.reader;

        let mut track = tokio::task::spawn_blocking(move || reader.read(&path, index))
            .await
            .map_err(|e| LibraryError::Task(e.to_string()))??;

        track.size_bytes = self.tracks[index].size_bytes;
        debug!(index, title = %track.title, "Read track metadata");
        Ok(track)
    }

    async fn get_initial_track(&self) -> simple_audio_core::Result<TrackIndex> {
        Ok(self.state.get().await.last_track)
    }

    async fn set_initial_track(&self, index: TrackIndex) -> simple_audio_core::Result<()> {
        if index >= self.tracks.len() {
            return Err(CoreError::out_of_range(index, self.tracks.len()));
        }
        self.state
            .update(|s| s.last_track = index)
            .await
            .map_err(CoreError::from)
    }

    async fn get_volume(&self) -> simple_audio_core::Result<f64> {
        Ok(self.state.get().await.volume)
    }

    async fn set_volume(&self, volume: f64) -> simple_audio_core::Result<()> {
        if volume.is_nan() {
            return Err(CoreError::invalid_input("volume is NaN"));
        }
        let volume = volume.clamp(0.0, 1.0);
        self.state
            .update(|s| s.volume = volume)
            .await
            .map_err(CoreError::from)
    }

    async fn get_repeat(&self) -> simple_audio_core::Result<bool> {
        Ok(self.state.get().await.repeat)
    }

    async fn set_repeat(&self, repeat: bool) -> simple_audio_core::Result<()> {
        self.state
            .update(|s| s.repeat = repeat)
            .await
            .map_err(CoreError::from)
    }
}
