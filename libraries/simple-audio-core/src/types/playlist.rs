/// Playlist domain type
use super::track::Track;
use super::TrackIndex;
use serde::{Deserialize, Serialize};

/// Ordered, index-addressable track list
///
/// Fixed for the lifetime of a session: entries are never inserted or
/// removed, only enriched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Build a playlist, renumbering entries so `index` matches position
    pub fn new(mut tracks: Vec<Track>) -> Self {
        for (position, track) in tracks.iter_mut().enumerate() {
            track.index = position;
        }
        Self { tracks }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get a track by index
    pub fn get(&self, index: TrackIndex) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Whether `index` addresses a track
    pub fn contains(&self, index: TrackIndex) -> bool {
        index < self.tracks.len()
    }

    /// Whether a track follows `index`
    pub fn has_next(&self, index: TrackIndex) -> bool {
        index + 1 < self.tracks.len()
    }

    /// Whether a track precedes `index`
    pub fn has_previous(&self, index: TrackIndex) -> bool {
        index > 0 && index <= self.tracks.len()
    }

    /// Merge a freshly fetched track into the entry with the same index
    ///
    /// Returns `false` when the index is outside the playlist.
    pub fn enrich(&mut self, track: Track) -> bool {
        match self.tracks.get_mut(track.index) {
            Some(existing) => {
                existing.enrich(track);
                true
            }
            None => false,
        }
    }

    /// Iterate over tracks in order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Borrow all tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
