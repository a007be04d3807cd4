//! SimpleAudio Library
//!
//! Host-side track provider backed by a music directory.
//!
//! This crate provides:
//! - Recursive scanning for MP3, WAV, OGG, FLAC, M4A and OPUS files
//! - Whole-file base64 payloads for the device audio element
//! - Lazy tag, stream property and cover art reading (lofty)
//! - Persisted last track, volume and repeat flag
//!
//! # Example
//!
//! ```rust,no_run
//! use simple_audio_core::TrackProvider;
//! use simple_audio_library::{LibraryConfig, LibraryProvider};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LibraryConfig::load()?;
//! let library = LibraryProvider::open(&config).await?;
//!
//! let playlist = library.get_playlist().await?;
//! println!("{} tracks", playlist.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod metadata;
mod provider;
mod scanner;
mod state;

pub use config::{expand_home, LibraryConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use error::{LibraryError, Result};
pub use metadata::{TagReader, MAX_COVER_SIZE};
pub use provider::LibraryProvider;
pub use scanner::{audio_extension, is_audio_file, mime_type, LibraryScanner, SUPPORTED_EXTENSIONS};
pub use state::{SessionState, StateStore};
