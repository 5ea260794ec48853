//! Client-local string storage, the desktop counterpart of a browser's
//! `localStorage`: one namespace of string keys mapping to string values.
//!
//! There is no cross-process coordination. Two processes sharing a
//! [`FileStore`] race and the last writer wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use gatechat_common::PlatformError;

/// String key/value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PlatformError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PlatformError>;
    fn remove(&self, key: &str) -> Result<(), PlatformError>;
}
