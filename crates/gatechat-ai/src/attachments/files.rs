use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::AttachmentFile;

/// A file on the local disk. Bytes are read lazily at send time.
#[derive(Debug, Clone)]
pub struct FsAttachment {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
}

impl FsAttachment {
    /// Stat the file and guess its MIME type from the extension.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::with_metadata(path, mime_type, metadata.len()))
    }

    pub fn with_metadata(
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            mime_type: mime_type.into(),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AttachmentFile for FsAttachment {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// An attachment whose bytes are already in memory (pasted images).
#[derive(Debug, Clone)]
pub struct MemoryAttachment {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryAttachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[async_trait]
impl AttachmentFile for MemoryAttachment {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
