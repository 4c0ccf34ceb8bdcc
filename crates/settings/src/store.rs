//! Key-value settings stores.
//!
//! The viewer persists scalar settings through a flat string key-value
//! interface; hosts can back it with whatever they have (browser storage, a
//! config file). `FileStore` is the JSON-file implementation used by the
//! native viewer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Flat string key-value persistence.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store for tests and the headless demo.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// JSON-file-backed store.
///
/// Writes go to the in-memory map; `flush` persists the whole map. A missing
/// file on load is an empty store, not an error.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, MemoryStore, SettingsStore};

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("screen_type"), None);
        store.set("screen_type", "tiled");
        assert_eq!(store.get("screen_type"), Some("tiled".to_owned()));
    }

    #[test]
    fn file_store_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");

        let mut store = FileStore::load(&path).unwrap();
        store.set("screen_distance", "4.5");
        store.flush().unwrap();

        let reloaded = FileStore::load(&path).unwrap();
        assert_eq!(reloaded.get("screen_distance"), Some("4.5".to_owned()));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::load(&path).is_err());
    }
}
