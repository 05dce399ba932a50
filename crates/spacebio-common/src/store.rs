//! Local persistence port.
//!
//! Bookmarks and the session cache go through `KeyValueStore` instead of
//! ambient global storage, so the core can run without a real browser or
//! filesystem. Values are JSON strings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{ClientError, Result};

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON (de)serialisation on top of any `KeyValueStore`.
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a value. A value that no longer decodes is treated as
    /// absent rather than failing the caller.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable stored value");
                Ok(None)
            }
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| ClientError::Storage(format!("encode {key}: {e}")))?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<()> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<()> { (**self).remove(key) }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<()> { (**self).set(key, value) }
    fn remove(&self, key: &str) -> Result<()> { (**self).remove(key) }
}

// ── In-memory ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| ClientError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

fn storage_err(action: &str, path: &Path, e: std::io::Error) -> ClientError {
    ClientError::Storage(format!("{action} {}: {e}", path.display()))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read", &path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| storage_err("create", &self.dir, e))?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| storage_err("write", &path, e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_undecodable_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        let value: Option<Vec<String>> = store.get_json("broken").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set_json("spacebio.last_query", "bone loss").unwrap();

        let reopened = FileStore::new(dir.path());
        let q: Option<String> = reopened.get_json("spacebio.last_query").unwrap();
        assert_eq!(q.as_deref(), Some("bone loss"));

        reopened.remove("spacebio.last_query").unwrap();
        reopened.remove("spacebio.last_query").unwrap();
        assert_eq!(reopened.get("spacebio.last_query").unwrap(), None);
    }

    #[test]
    fn test_file_store_sanitises_keys() {
        let store = FileStore::new("/tmp/x");
        assert_eq!(store.path_for("a/b c"), PathBuf::from("/tmp/x/a_b_c.json"));
    }
}
