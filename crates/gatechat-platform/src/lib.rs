//! Platform services: OS paths, client-local key/value storage, and the
//! wall clock.

pub mod clock;
pub mod paths;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
