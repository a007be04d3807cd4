//! Persisted session state
//!
//! Last active track, volume and repeat flag survive restarts in a small JSON
//! file. A missing or unreadable file is treated as a first run.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use simple_audio_core::TrackIndex;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Values remembered between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub last_track: TrackIndex,
    pub volume: f64,
    pub repeat: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            last_track: 0,
            volume: 1.0,
            repeat: false,
        }
    }
}

/// JSON-file backed store for [`SessionState`]
///
/// Writes are serialized through the lock and land via a temp file rename,
/// so a crash mid-write leaves the previous state intact.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: Mutex<SessionState>,
}

impl StateStore {
    /// Open the store, reading the file if it exists
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = read_state(&path).await;
        debug!(path = %path.display(), ?state, "Session state loaded");
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current state
    pub async fn get(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Apply a change and write it to disk
    ///
    /// The in-memory value is updated even if the write fails.
    pub async fn update(&self, apply: impl FnOnce(&mut SessionState)) -> Result<()> {
        let mut state = self.state.lock().await;
        apply(&mut state);
        let json = serde_json::to_vec_pretty(&*state)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn read_state(path: &Path) -> SessionState {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SessionState::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read session state, using defaults");
            return SessionState::default();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Corrupt session state, using defaults");
        SessionState::default()
    })
}
