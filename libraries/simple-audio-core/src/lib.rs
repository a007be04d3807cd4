//! SimpleAudio Core
//!
//! Platform-agnostic types, the track provider trait, and error handling
//! shared by the SimpleAudio panel crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `MediaRef`, `Artwork`
//! - **Core Traits**: `TrackProvider` (the host side of the panel)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use simple_audio_core::{MediaRef, Playlist, Track};
//!
//! let mut playlist = Playlist::new(vec![Track::new(0, "intro.mp3"), Track::new(1, "outro.mp3")]);
//! assert_eq!(playlist.len(), 2);
//! assert!(playlist.has_next(0));
//!
//! let mut loaded = Track::new(1, "Outro");
//! loaded.media = Some(MediaRef::url("file:///music/outro.mp3"));
//! playlist.enrich(loaded);
//! assert_eq!(playlist.get(1).map(|t| t.title.as_str()), Some("Outro"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::TrackProvider;
pub use types::{Artwork, MediaRef, Playlist, TechnicalInfo, Track, TrackIndex};
