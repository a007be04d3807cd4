/// Library configuration
use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "simple-audio.toml";

/// Environment variable prefix (`SIMPLE_AUDIO_MUSIC_DIR`, ...)
pub const ENV_PREFIX: &str = "SIMPLE_AUDIO";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory scanned for audio files (`~` is expanded)
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    /// JSON file holding last track, volume and repeat flag
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_links: bool,

    /// Maximum directory depth to traverse (unlimited when unset)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl LibraryConfig {
    /// Load configuration from `simple-audio.toml` and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a specific file and environment
    ///
    /// A missing file is not an error; environment variables override file
    /// values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| LibraryError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.music_dir.as_os_str().is_empty() {
            return Err(LibraryError::Config(
                "music directory is required (set SIMPLE_AUDIO_MUSIC_DIR)".to_string(),
            ));
        }

        if self.state_file.file_name().is_none() {
            return Err(LibraryError::Config(format!(
                "state file {:?} does not name a file",
                self.state_file
            )));
        }

        if self.max_depth == Some(0) {
            return Err(LibraryError::Config(
                "max_depth of 0 would scan nothing".to_string(),
            ));
        }

        Ok(())
    }

    /// Music directory with `~` expanded
    pub fn music_dir(&self) -> PathBuf {
        expand_home(&self.music_dir)
    }

    /// State file with `~` expanded
    pub fn state_file(&self) -> PathBuf {
        expand_home(&self.state_file)
    }
}

/// Replace a leading `~` with `$HOME`
///
/// Paths without a leading `~`, or a missing `HOME`, pass through unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

// Default values
fn default_music_dir() -> PathBuf {
    PathBuf::from("~/Music")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("~/.local/share/simple-audio/state.json")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            state_file: default_state_file(),
            follow_links: false,
            max_depth: None,
        }
    }
}
