//! Image attachment limits.

use serde::{Deserialize, Serialize};

/// 20 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentsConfig {
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types must start with this prefix.
    pub allowed_mime_prefix: String,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_prefix: "image/".into(),
        }
    }
}
