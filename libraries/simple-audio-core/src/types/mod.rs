//! Core domain types for SimpleAudio

mod media;
mod playlist;
mod track;

pub use media::{Artwork, MediaRef};
pub use playlist::Playlist;
pub use track::{TechnicalInfo, Track};

/// Position of a track within the playlist
///
/// The index is the track's identity: it is stable for the lifetime of a
/// session and every provider call addresses tracks by it.
pub type TrackIndex = usize;
