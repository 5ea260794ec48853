//! The persisted unlock credential and its expiry window.

mod expiry;
mod store;

pub use expiry::{hours_elapsed, remaining_validity, RemainingTime};
pub use store::{SessionStore, StoreError, StoredCredential, CREDENTIAL_STORAGE_KEY};
