//! Persistence contract for sessions and the best score.
//!
//! The engine only ever talks to a [`StateStore`]; where the bytes live is up
//! to the implementation. Two are provided: an in-memory store and a JSON file
//! store that keeps one file per key in a directory.
//!
//! The file store wraps the session in `{savedAt, checksum, state}`. A state
//! whose SHA-256 no longer matches is reported as [`StoreError::Checksum`]; one
//! older than the maximum age (72 hours by default) is cleared and treated as
//! absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

use crate::core::SavedState;

const STATE_FILE: &str = "game_state.json";
const BEST_SCORE_FILE: &str = "best_score.json";

/// Saved sessions older than this are discarded on load
pub const MAX_STATE_AGE: Duration = Duration::from_secs(72 * 60 * 60);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored session failed its checksum")]
    Checksum,
}

/// External session storage.
///
/// Calls are issued synchronously at the end of a turn and must not call back
/// into the engine.
pub trait StateStore {
    /// Previously saved session, if any. Validation is the caller's job.
    fn load_state(&mut self) -> Result<Option<SavedState>, StoreError>;
    fn save_state(&mut self, state: &SavedState) -> Result<(), StoreError>;
    fn clear_state(&mut self) -> Result<(), StoreError>;
    /// Best score across sessions; 0 when unknown
    fn best_score(&self) -> u32;
    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<SavedState>,
    best_score: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a saved session
    pub fn with_state(state: SavedState) -> Self {
        Self {
            state: Some(state),
            best_score: 0,
        }
    }

    pub fn state(&self) -> Option<&SavedState> {
        self.state.as_ref()
    }
}

impl StateStore for MemoryStore {
    fn load_state(&mut self) -> Result<Option<SavedState>, StoreError> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &SavedState) -> Result<(), StoreError> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn clear_state(&mut self) -> Result<(), StoreError> {
        self.state = None;
        Ok(())
    }

    fn best_score(&self) -> u32 {
        self.best_score
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.best_score = score;
        Ok(())
    }
}

/// On-disk envelope of `game_state.json`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    /// Unix seconds
    saved_at: u64,
    checksum: String,
    state: SavedState,
}

fn checksum(state: &SavedState) -> Result<String, StoreError> {
    let bytes = serde_json::to_vec(state)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Stores `game_state.json` and `best_score.json` in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    max_age: Duration,
}

impl JsonFileStore {
    /// Use `dir`, creating it if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_age: MAX_STATE_AGE,
        })
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn best_score_path(&self) -> PathBuf {
        self.dir.join(BEST_SCORE_FILE)
    }
}

impl StateStore for JsonFileStore {
    fn load_state(&mut self) -> Result<Option<SavedState>, StoreError> {
        let path = self.state_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let stored: StoredState = serde_json::from_str(&text)?;
        if checksum(&stored.state)? != stored.checksum {
            return Err(StoreError::Checksum);
        }

        let age = unix_now().saturating_sub(stored.saved_at);
        if age > self.max_age.as_secs() {
            warn!(age_secs = age, "saved session expired, clearing");
            self.clear_state()?;
            return Ok(None);
        }
        Ok(Some(stored.state))
    }

    fn save_state(&mut self, state: &SavedState) -> Result<(), StoreError> {
        let stored = StoredState {
            saved_at: unix_now(),
            checksum: checksum(state)?,
            state: state.clone(),
        };
        fs::write(self.state_path(), serde_json::to_string(&stored)?)?;
        Ok(())
    }

    fn clear_state(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(self.state_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn best_score(&self) -> u32 {
        let path = self.best_score_path();
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(text.trim()).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring unreadable best score");
                0
            }),
            Err(_) => 0,
        }
    }

    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError> {
        fs::write(self.best_score_path(), serde_json::to_string(&score)?)?;
        Ok(())
    }
}
