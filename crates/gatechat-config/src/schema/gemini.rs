//! Remote generative API settings.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini endpoint and key pool configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    /// Interchangeable access keys, tried in order on failure.
    pub api_keys: Vec<String>,
    pub model: String,
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for GeminiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSection")
            .field("api_keys", &format_args!("[{} REDACTED]", self.api_keys.len()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: "gemini-2.0-flash".into(),
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
