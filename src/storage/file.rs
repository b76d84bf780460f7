use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::storage::kv::KeyValueStore;

/// A file-backed key-value store.
///
/// Backs the durable session tier: the full key set is kept as a single JSON
/// object on disk and rewritten on every mutation, so contents survive process
/// restarts. Reads go through an in-memory copy loaded lazily from disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<HashMap<String, String>>>,
}

impl FileStore {
    /// Creates a `FileStore` backed by the given path.
    ///
    /// The file and its parent directory are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// The path backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("Failed to read session file: {}", e)))?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| ClientError::Storage(format!("Corrupt session file: {}", e)))
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ClientError::Storage(format!("Failed to create session directory: {}", e))
                })?;
            }
        }
        let json = serde_json::to_string(entries)?;
        fs::write(&self.path, json)
            .map_err(|e| ClientError::Storage(format!("Failed to write session file: {}", e)))
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("File store lock poisoned".to_string()))?;
        if guard.is_none() {
            *guard = Some(self.load()?);
        }
        // Unwrap is safe: populated just above.
        f(guard.as_mut().unwrap())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(|entries| Ok(entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(entries.clone())
        })
        .and_then(|entries| self.flush(&entries))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let (changed, entries) = self.with_entries(|entries| {
            let changed = entries.remove(key).is_some();
            Ok((changed, entries.clone()))
        })?;
        if changed {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_new_store_over_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::new(&path);
        store.set("access_token", "abc").unwrap();
        store.set("user", "{\"id\":1}").unwrap();

        // A fresh store over the same path simulates a new browser session.
        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("access_token").unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(reopened.get("user").unwrap(), Some("{\"id\":1}".to_string()));
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::new(&path);
        store.set("access_token", "abc").unwrap();
        store.remove("access_token").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("access_token").unwrap(), None);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").unwrap(), None);
    }
}
