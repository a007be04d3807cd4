/// Track domain type
use super::media::{Artwork, MediaRef};
use super::TrackIndex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Audio track
///
/// Identity is `index`. Everything else is display metadata that may be
/// filled in lazily as the provider resolves or tags the file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    /// Position in the playlist
    pub index: TrackIndex,

    /// Track title (falls back to the file name)
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: Option<String>,

    /// Album name
    #[serde(default)]
    pub album: Option<String>,

    /// Album artist
    #[serde(default)]
    pub album_artist: Option<String>,

    /// Genre
    #[serde(default)]
    pub genre: Option<String>,

    /// Release year
    #[serde(default)]
    pub year: Option<u32>,

    /// Disc number
    #[serde(default)]
    pub disc_number: Option<u32>,

    /// Track number
    #[serde(default)]
    pub track_number: Option<u32>,

    /// Embedded cover image
    #[serde(default)]
    pub cover: Option<Artwork>,

    /// Technical stream properties
    #[serde(default)]
    pub technical: Option<TechnicalInfo>,

    /// Track duration in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Playable media reference (absent until resolved)
    #[serde(default)]
    pub media: Option<MediaRef>,

    /// File path on the host
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// File size in bytes
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// Technical tags reported by the decoder/tag reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TechnicalInfo {
    /// Audio bitrate in kbps
    pub bitrate_kbps: Option<u32>,
    /// Sample rate in Hz
    pub sample_rate: Option<u32>,
    /// Channel count
    pub channels: Option<u8>,
    /// Bits per sample
    pub bit_depth: Option<u8>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(index: TrackIndex, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Track duration, if known
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Whether the track carries a usable media reference
    pub fn is_playable(&self) -> bool {
        self.media.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Artist line for display
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown artist")
    }

    /// Merge metadata from a freshly fetched copy of the same track
    ///
    /// Fields present in `other` win; fields it leaves empty keep their
    /// current value. The index is never changed.
    pub fn enrich(&mut self, other: Track) {
        if !other.title.is_empty() {
            self.title = other.title;
        }
        merge(&mut self.artist, other.artist);
        merge(&mut self.album, other.album);
        merge(&mut self.album_artist, other.album_artist);
        merge(&mut self.genre, other.genre);
        merge(&mut self.year, other.year);
        merge(&mut self.disc_number, other.disc_number);
        merge(&mut self.track_number, other.track_number);
        merge(&mut self.cover, other.cover);
        merge(&mut self.technical, other.technical);
        merge(&mut self.duration_ms, other.duration_ms);
        merge(&mut self.media, other.media);
        merge(&mut self.path, other.path);
        merge(&mut self.size_bytes, other.size_bytes);
    }
}

fn merge<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}
