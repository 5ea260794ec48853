use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use super::{AttachmentFile, AttachmentProvider};

/// Intake rules for pending attachments.
#[derive(Debug, Clone)]
pub struct AttachmentLimits {
    pub max_file_size: u64,
    pub allowed_mime_prefix: String,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
            allowed_mime_prefix: "image/".into(),
        }
    }
}

/// Why a file was not accepted. The display text is shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentRejection {
    #[error("Only image files are allowed! ({name} is {mime_type})")]
    UnsupportedType { name: String, mime_type: String },
    #[error("{name} is larger than the {max_mib} MB limit!")]
    TooLarge { name: String, size: u64, max_mib: u64 },
}

/// A pending file as listed in the attachment tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSummary {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

struct PendingFile {
    id: Uuid,
    file: Arc<dyn AttachmentFile>,
}

/// The tray of files that will go out with the next message.
///
/// Shared between the input adapter (which adds files) and the
/// conversation (which sends and clears them), so it locks internally.
pub struct PendingAttachments {
    limits: AttachmentLimits,
    files: Mutex<Vec<PendingFile>>,
}

impl PendingAttachments {
    pub fn new(limits: AttachmentLimits) -> Self {
        Self {
            limits,
            files: Mutex::new(Vec::new()),
        }
    }

    fn files(&self) -> MutexGuard<'_, Vec<PendingFile>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Validate and queue a file, returning its tray id.
    pub fn add(&self, file: Arc<dyn AttachmentFile>) -> Result<Uuid, AttachmentRejection> {
        if !file.mime_type().starts_with(&self.limits.allowed_mime_prefix) {
            return Err(AttachmentRejection::UnsupportedType {
                name: file.name().to_string(),
                mime_type: file.mime_type().to_string(),
            });
        }
        if file.size() > self.limits.max_file_size {
            return Err(AttachmentRejection::TooLarge {
                name: file.name().to_string(),
                size: file.size(),
                max_mib: self.limits.max_file_size / (1024 * 1024),
            });
        }

        let id = Uuid::new_v4();
        debug!(%id, name = file.name(), size = file.size(), "attachment queued");
        self.files().push(PendingFile { id, file });
        Ok(id)
    }

    /// Remove one file by id. Returns whether it was present.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut files = self.files();
        let before = files.len();
        files.retain(|f| f.id != id);
        files.len() != before
    }

    pub fn summaries(&self) -> Vec<PendingSummary> {
        self.files()
            .iter()
            .map(|f| PendingSummary {
                id: f.id,
                name: f.file.name().to_string(),
                mime_type: f.file.mime_type().to_string(),
                size: f.file.size(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

impl Default for PendingAttachments {
    fn default() -> Self {
        Self::new(AttachmentLimits::default())
    }
}

impl AttachmentProvider for PendingAttachments {
    fn has_pending_files(&self) -> bool {
        !self.is_empty()
    }

    fn list_pending_files(&self) -> Vec<Arc<dyn AttachmentFile>> {
        self.files().iter().map(|f| Arc::clone(&f.file)).collect()
    }

    fn clear_pending_files(&self) {
        self.files().clear();
    }
}
