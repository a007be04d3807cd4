//! Music directory scanning

use crate::{LibraryError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Supported audio file extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "opus"];

/// Scanner for audio files in a music directory
#[derive(Debug, Clone, Default)]
pub struct LibraryScanner {
    /// Whether to follow symbolic links
    follow_links: bool,

    /// Maximum depth to traverse (unlimited when `None`)
    max_depth: Option<usize>,
}

impl LibraryScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory recursively for audio files
    ///
    /// Results are ordered by file name, case-insensitively. A missing
    /// directory is an empty library, not an error.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            info!(dir = %dir.display(), "Music directory does not exist, library is empty");
            return Ok(Vec::new());
        }

        if !dir.is_dir() {
            return Err(LibraryError::InvalidPath(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut walker = WalkDir::new(dir).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| is_audio_file(path))
            .collect();

        files.sort_by_cached_key(|path| (sort_key(path), path.clone()));

        info!(dir = %dir.display(), count = files.len(), "Found audio files");
        Ok(files)
    }
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Check if a file has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    audio_extension(path).is_some()
}

/// Lowercased audio extension, if supported
pub fn audio_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type the media sink expects for a file
pub fn mime_type(path: &Path) -> &'static str {
    match audio_extension(path).as_deref() {
        Some("wav") => "audio/wav",
        Some("ogg" | "opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        _ => "audio/mpeg",
    }
}
