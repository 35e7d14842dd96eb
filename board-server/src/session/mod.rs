//! Persisted session preference.
//!
//! A single value survives across sessions: the station the user last
//! queried, used to pre-select it next time. Stored as a small JSON
//! file; no transactional guarantees, last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors raised while writing the session file.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    last_station: Option<String>,
}

/// File-backed store for the last selected station.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The last successfully queried station, if any was recorded.
    ///
    /// A missing or unreadable file is simply "nothing recorded".
    pub fn last_station(&self) -> Option<String> {
        let text = fs::read_to_string(&self.path).ok()?;
        let data: SessionData = serde_json::from_str(&text).ok()?;
        data.last_station
    }

    /// Record a station as the last selected one.
    pub fn remember_station(&self, station: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = SessionData {
            last_station: Some(station.to_string()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&data)?)?;
        debug!(station, path = %self.path.display(), "remembered station");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_nothing_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.last_station(), None);
    }

    #[test]
    fn remember_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.remember_station("Machida").unwrap();
        assert_eq!(store.last_station(), Some("Machida".to_string()));
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.remember_station("Machida").unwrap();
        store.remember_station("Hashimoto").unwrap();
        assert_eq!(store.last_station(), Some("Hashimoto".to_string()));
    }

    #[test]
    fn corrupt_file_reads_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let store = SessionStore::new(&path);
        assert_eq!(store.last_station(), None);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/deeper/session.json"));

        store.remember_station("Hachioji").unwrap();
        assert_eq!(store.last_station(), Some("Hachioji".to_string()));
    }
}
