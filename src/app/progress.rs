//! Session progress snapshots and where they are kept
//!
//! The snapshot mirrors the progress payload the backend stores per play
//! session. Storage itself is behind [`ProgressStore`]; the grid never talks
//! to a store directly.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Saved completion state of one play session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub grid_size: usize,
    /// Completed cells, excluding the free cell
    pub completed: Vec<usize>,
    /// At least one line was won
    pub is_completed: bool,
    /// Where each cell's photo can be loaded from
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub photos: BTreeMap<usize, PathBuf>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid session id {0:?}")]
    InvalidSessionId(String),
    #[error("Store IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Malformed progress data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persistence boundary for session progress
pub trait ProgressStore {
    /// Loads saved progress, `None` if the session has none yet
    ///
    /// # Errors
    /// Storage or decoding failures.
    fn load(&self, session_id: &str) -> Result<Option<SessionProgress>, StoreError>;

    /// Saves progress, replacing what was stored before
    ///
    /// # Errors
    /// Storage or encoding failures.
    fn save(&self, session_id: &str, progress: &SessionProgress) -> Result<(), StoreError>;
}

/// Stores each session as `<dir>/<session_id>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StoreError::InvalidSessionId(session_id.to_string()));
        }
        Ok(self.dir.join(format!("{session_id}.json")))
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self, session_id: &str) -> Result<Option<SessionProgress>, StoreError> {
        let path = self.path_for(session_id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, session_id: &str, progress: &SessionProgress) -> Result<(), StoreError> {
        let path = self.path_for(session_id)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let text = serde_json::to_string_pretty(progress)?;
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })?;
        log::debug!("Saved progress for session {session_id}");
        Ok(())
    }
}
