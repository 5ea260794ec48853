use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gatechat_common::PlatformError;
use tracing::warn;

use super::KeyValueStore;

/// Storage persisted as a single JSON object file.
///
/// Every operation re-reads the file so external edits are picked up.
/// A file that is not a JSON object of strings is treated as empty and
/// replaced on the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open the store at the platform default location.
    pub fn open_default() -> Result<Self, PlatformError> {
        Ok(Self::new(crate::paths::storage_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PlatformError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(PlatformError::StorageError(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!("ignoring unreadable storage file {}: {e}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<(), PlatformError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlatformError::StorageError(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| PlatformError::StorageError(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| {
            PlatformError::StorageError(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    fn modify<F>(&self, f: F) -> Result<(), PlatformError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PlatformError::StorageError("file store lock poisoned".into()))?;
        let mut map = self.load()?;
        f(&mut map);
        self.persist(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        self.modify(|map| {
            map.remove(key);
        })
    }
}
