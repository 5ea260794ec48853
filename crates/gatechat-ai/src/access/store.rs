//! The single persisted unlock credential.

use std::fmt;
use std::sync::Arc;

use gatechat_common::PlatformError;
use gatechat_platform::{Clock, KeyValueStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::expiry::{hours_elapsed, remaining_validity, RemainingTime};

/// Storage key of the credential record.
pub const CREDENTIAL_STORAGE_KEY: &str = "gatechat_key";

/// Persisted as `{"key": "...", "timestamp": <epoch ms>}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(rename = "key")]
    pub secret: String,
    #[serde(rename = "timestamp")]
    pub issued_at: i64,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("secret", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("malformed stored credential: {0}")]
    MalformedRecord(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] PlatformError),
}

/// Reads, validates, and evicts the credential record.
///
/// Storage failures never escape: a record that cannot be read counts as
/// absent and a write that fails is logged.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    valid_secret: String,
    expiry_hours: u32,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        valid_secret: impl Into<String>,
        expiry_hours: u32,
    ) -> Self {
        Self {
            storage,
            clock,
            valid_secret: valid_secret.into(),
            expiry_hours,
        }
    }

    pub fn expiry_hours(&self) -> u32 {
        self.expiry_hours
    }

    /// Whether `candidate` is the configured secret.
    pub fn matches_secret(&self, candidate: &str) -> bool {
        candidate == self.valid_secret
    }

    /// Replace any existing record with `{secret, now}`.
    pub fn save(&self, secret: &str) {
        let record = StoredCredential {
            secret: secret.to_string(),
            issued_at: self.clock.now_ms(),
        };
        let result = serde_json::to_string(&record)
            .map_err(StoreError::from)
            .and_then(|json| {
                self.storage
                    .set(CREDENTIAL_STORAGE_KEY, &json)
                    .map_err(StoreError::from)
            });
        match result {
            Ok(()) => debug!(issued_at = record.issued_at, "credential saved"),
            Err(e) => warn!("failed to persist credential: {e}"),
        }
    }

    /// Read the record, surfacing why it could not be read.
    pub fn try_read(&self) -> Result<Option<StoredCredential>, StoreError> {
        match self.storage.get(CREDENTIAL_STORAGE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read the record; unreadable or malformed data counts as absent.
    pub fn read(&self) -> Option<StoredCredential> {
        match self.try_read() {
            Ok(record) => record,
            Err(e) => {
                warn!("ignoring stored credential: {e}");
                None
            }
        }
    }

    /// Read, validate, and evict.
    ///
    /// True iff a record exists, is younger than the expiry window, and
    /// holds the configured secret. A present record that fails either
    /// check (or cannot be parsed) is removed before returning false.
    pub fn is_valid(&self) -> bool {
        let record = match self.try_read() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                warn!("evicting unreadable credential: {e}");
                self.clear();
                return false;
            }
        };

        if self.record_is_valid(&record) {
            return true;
        }

        info!("stored credential expired or no longer matches, clearing");
        self.clear();
        false
    }

    /// Remove the record unconditionally.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(CREDENTIAL_STORAGE_KEY) {
            warn!("failed to clear credential: {e}");
        }
    }

    /// Time left on a valid record. Does not evict.
    pub fn remaining_time(&self) -> Option<RemainingTime> {
        let record = self.read()?;
        if record.secret != self.valid_secret {
            return None;
        }
        remaining_validity(record.issued_at, self.clock.now_ms(), self.expiry_hours)
    }

    fn record_is_valid(&self, record: &StoredCredential) -> bool {
        let Some(elapsed) = hours_elapsed(record.issued_at, self.clock.now_ms()) else {
            return false;
        };
        elapsed < f64::from(self.expiry_hours) && record.secret == self.valid_secret
    }
}
