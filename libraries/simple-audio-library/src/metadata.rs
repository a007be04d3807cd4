/// Tag and cover art reader implementation using lofty
use crate::error::{LibraryError, Result};
use lofty::{AudioFile, ItemKey, PictureType, TaggedFileExt};
use simple_audio_core::{Artwork, TechnicalInfo, Track, TrackIndex};
use std::path::Path;
use tracing::warn;

/// Maximum cover size (5MB)
pub const MAX_COVER_SIZE: usize = 5 * 1024 * 1024;

/// Tag reader using the lofty library
#[derive(Debug, Clone, Copy, Default)]
pub struct TagReader;

impl TagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self
    }

    /// Read tags, stream properties and cover art for one file
    ///
    /// The title falls back to the file name when the file has no title tag.
    pub fn read(&self, path: &Path, index: TrackIndex) -> Result<Track> {
        if !path.exists() {
            return Err(LibraryError::FileNotFound(path.to_path_buf()));
        }

        let tagged_file = lofty::read_from_path(path)?;

        let mut track = Track::new(index, file_title(path));
        track.path = Some(path.to_path_buf());

        let properties = tagged_file.properties();
        track.duration_ms = Some(properties.duration().as_millis() as u64);
        track.technical = Some(TechnicalInfo {
            bitrate_kbps: properties.audio_bitrate(),
            sample_rate: properties.sample_rate(),
            channels: properties.channels(),
            bit_depth: properties.bit_depth(),
        });

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());
        if let Some(tag) = tag {
            Self::apply_tag(&mut track, tag);
            track.cover = Self::cover(path, tag);
        }

        Ok(track)
    }

    /// Copy text items from a lofty tag onto the track
    fn apply_tag(track: &mut Track, tag: &lofty::Tag) {
        for item in tag.items() {
            let Some(text) = item.value().text() else {
                continue;
            };
            match item.key() {
                ItemKey::TrackTitle if !text.trim().is_empty() => {
                    track.title = text.to_string();
                }
                ItemKey::TrackArtist => track.artist = Some(text.to_string()),
                ItemKey::AlbumTitle => track.album = Some(text.to_string()),
                ItemKey::AlbumArtist => track.album_artist = Some(text.to_string()),
                ItemKey::Genre => track.genre = Some(text.to_string()),
                ItemKey::Year => track.year = parse_number(text).or(track.year),
                ItemKey::RecordingDate if track.year.is_none() => {
                    track.year = text.get(..4).and_then(|y| y.parse().ok());
                }
                ItemKey::TrackNumber => track.track_number = parse_number(text),
                ItemKey::DiscNumber => track.disc_number = parse_number(text),
                _ => {}
            }
        }
    }

    /// Front cover, falling back to the first picture; oversized art is skipped
    fn cover(path: &Path, tag: &lofty::Tag) -> Option<Artwork> {
        let pictures = tag.pictures();
        let picture = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first())?;

        let data = picture.data();
        if data.len() > MAX_COVER_SIZE {
            warn!(
                path = %path.display(),
                size = data.len(),
                max = MAX_COVER_SIZE,
                "Cover art too large, skipping"
            );
            return None;
        }

        let mime_type = picture
            .mime_type()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        Some(Artwork::new(data.to_vec(), mime_type))
    }
}

/// File name used as the display title
pub fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse "3" or "3/12" style numbers
fn parse_number(text: &str) -> Option<u32> {
    text.split('/').next()?.trim().parse().ok()
}
