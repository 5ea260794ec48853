//! Image attachments: file handles, the pending-file tray, and base64
//! encoding for inline request data.

mod files;
mod pending;

pub use files::{FsAttachment, MemoryAttachment};
pub use pending::{AttachmentLimits, AttachmentRejection, PendingAttachments, PendingSummary};

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;

use crate::{AiError, InlineData};

/// A file the user picked, readable on demand.
#[async_trait]
pub trait AttachmentFile: Send + Sync {
    fn name(&self) -> &str;
    fn mime_type(&self) -> &str;
    /// Size in bytes.
    fn size(&self) -> u64;
    async fn read_bytes(&self) -> std::io::Result<Vec<u8>>;
}

/// Files waiting to go out with the next message.
pub trait AttachmentProvider: Send + Sync {
    fn has_pending_files(&self) -> bool;
    fn list_pending_files(&self) -> Vec<Arc<dyn AttachmentFile>>;
    fn clear_pending_files(&self);
}

/// Read a file and wrap its bytes as base64 inline data.
pub async fn encode_attachment(file: &dyn AttachmentFile) -> Result<InlineData, AiError> {
    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| AiError::Encoding(format!("{}: {e}", file.name())))?;
    Ok(InlineData {
        mime_type: file.mime_type().to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}
