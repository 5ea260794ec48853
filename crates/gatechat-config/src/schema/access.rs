//! Access gate settings: the shared passphrase and how long an unlock lasts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access gate configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// The passphrase that unlocks the chat.
    pub valid_secret: String,
    /// Hours a stored unlock stays valid (valid range: 1-8760).
    pub expiry_hours: u32,
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("valid_secret", &"[REDACTED]")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            valid_secret: String::new(),
            expiry_hours: 24,
        }
    }
}
