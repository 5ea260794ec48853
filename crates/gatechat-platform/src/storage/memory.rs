use std::collections::HashMap;
use std::sync::Mutex;

use gatechat_common::PlatformError;

use super::KeyValueStore;

/// Process-local storage that forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, PlatformError> {
        self.entries
            .lock()
            .map_err(|_| PlatformError::StorageError("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
