//! Durable key-value slices.
//!
//! Every slice (catalog, engines, settings) is stored as one JSON document
//! under its own key and always overwritten as a whole.

mod database;

pub use database::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// Error type for the key-value substrate
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Database(rusqlite::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// A durable map from key to whole string value
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and sessions that should leave no trace
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with raw values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Typed JSON load/save on top of a [`KeyValueStore`].
///
/// Loading never fails: a missing key, a read error or malformed JSON all
/// come back as `None` so the caller can fall back to defaults. Saving is
/// fire-and-forget; failures are logged.
#[derive(Debug)]
pub struct PersistedStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistedStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Load and deserialize the value stored under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Stored value for '{}' is malformed, ignoring: {}", key, e);
                None
            }
        }
    }

    /// Load the raw stored string under `key`
    pub fn load_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to read '{}': {}", key, e);
                None
            }
        }
    }

    /// Serialize `value` and overwrite whatever is stored under `key`
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            log::error!("Failed to save '{}': {}", key, e);
        }
    }

    fn try_save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string(value)?;
        self.backend.set(key, &contents)?;
        log::debug!("Saved '{}' ({} bytes)", key, contents.len());
        Ok(())
    }

    /// Drop the value stored under `key`
    pub fn clear(&mut self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            log::error!("Failed to clear '{}': {}", key, e);
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let mut store = PersistedStore::new(MemoryStore::new());
        let sample = Sample { name: "a".into(), count: 3 };

        store.save("sample", &sample);

        assert_eq!(store.load::<Sample>("sample"), Some(sample));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let store = PersistedStore::new(MemoryStore::new());
        assert_eq!(store.load::<Sample>("nothing"), None);
    }

    #[test]
    fn test_malformed_json_is_absent() {
        let store = PersistedStore::new(MemoryStore::with_values([("sample", "{not json")]));
        assert_eq!(store.load::<Sample>("sample"), None);
        assert_eq!(store.load_raw("sample").as_deref(), Some("{not json"));
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let store = PersistedStore::new(MemoryStore::with_values([("sample", "[1, 2, 3]")]));
        assert_eq!(store.load::<Sample>("sample"), None);
    }

    #[test]
    fn test_save_overwrites_whole_value() {
        let mut store = PersistedStore::new(MemoryStore::new());
        store.save("sample", &Sample { name: "a".into(), count: 1 });
        store.save("sample", &Sample { name: "b".into(), count: 2 });

        let loaded: Sample = store.load("sample").unwrap();
        assert_eq!(loaded.name, "b");
        assert_eq!(loaded.count, 2);
    }

    #[test]
    fn test_clear() {
        let mut store = PersistedStore::new(MemoryStore::new());
        store.save("sample", &Sample { name: "a".into(), count: 1 });
        store.clear("sample");
        assert_eq!(store.load::<Sample>("sample"), None);
    }
}
