//! High-score persistence keyed by the settings string (`S10B20F1M3`).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub trait ScoreStore {
    /// Stored high score for `key`, or 0 when there is none.
    fn load(&self, key: &str) -> u32;

    fn store(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self, key: &str) -> u32 {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        (**self).store(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scores: HashMap<String, u32>,
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> u32 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    fn store(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.scores.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    scores: BTreeMap<String, u32>,
}

/// Scores kept in a small JSON file, rewritten on every store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: ScoreFile,
}

impl JsonFileStore {
    /// Opens the score file at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read(&path) {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => ScoreFile::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(JsonFileStore { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self, key: &str) -> u32 {
        self.file.scores.get(key).copied().unwrap_or(0)
    }

    fn store(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.file.scores.insert(key.to_string(), value);
        let encoded = serde_json::to_vec_pretty(&self.file).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, encoded).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_defaults_to_zero() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load("S10B20F1M3"), 0);
        store.store("S10B20F1M3", 9).unwrap();
        assert_eq!(store.load("S10B20F1M3"), 9);
        assert_eq!(store.load("S12B20F1M3"), 0);
    }

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load("S10B20F1M3"), 0);
        store.store("S10B20F1M3", 4).unwrap();
        store.store("S5B10F2M3", 11).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.load("S10B20F1M3"), 4);
        assert_eq!(reopened.load("S5B10F2M3"), 11);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn json_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }), "got {err:?}");
    }

    #[test]
    fn json_store_reports_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scores.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let err = store.store("S10B20F1M3", 1).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
    }
}
