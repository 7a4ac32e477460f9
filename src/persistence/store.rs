/// Key-value persistence for JSON documents
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::PersistenceError;

pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, `None` when nothing was stored yet
    fn load(&self, key: &str) -> Result<Option<JsonValue>, PersistenceError>;

    fn persist(&self, key: &str, value: &JsonValue) -> Result<(), PersistenceError>;
}

/// One pretty-printed `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<JsonValue>, PersistenceError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|source| PersistenceError::Read {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&contents).map_err(|source| PersistenceError::Json {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn persist(&self, key: &str, value: &JsonValue) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let write_err = |source: std::io::Error| PersistenceError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let contents = serde_json::to_string_pretty(value).map_err(|source| {
            PersistenceError::Json {
                key: key.to_string(),
                source,
            }
        })?;

        // Readers never observe a partially written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        debug!("Persisted '{}' to {:?}", key, path);
        Ok(())
    }
}

/// Process-local store; clones share contents and the write counter
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: Arc<RwLock<HashMap<String, JsonValue>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `persist` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.values.read().get(key).cloned()
    }
}

impl KeyValueStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<JsonValue>, PersistenceError> {
        Ok(self.get(key))
    }

    fn persist(&self, key: &str, value: &JsonValue) -> Result<(), PersistenceError> {
        self.values.write().insert(key.to_string(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
