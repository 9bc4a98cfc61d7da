//! Turning a picked image file into a data URL for the draft.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use tokio::io::AsyncReadExt;

use crate::error::FormError;

/// Largest image accepted by default (1 MB).
pub const ONE_MB: u64 = 1024 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A single file handed over by a file picker.
#[async_trait]
pub trait ImageFile: Send + Sync {
    /// File name as shown by the picker
    fn name(&self) -> &str;

    /// Size in bytes, known before the content is read
    fn size(&self) -> u64;

    /// MIME type used as the data URL prefix
    fn mime_type(&self) -> &str {
        mime_type_for(self.name())
    }

    /// Read the file content, stopping after `max_bytes + 1` bytes so an
    /// oversized file is detectable without loading all of it
    async fn read(&self, max_bytes: u64) -> io::Result<Vec<u8>>;
}

/// Image file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl LocalImageFile {
    /// Stat the file at `path`; fails if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(LocalImageFile {
            path,
            name,
            size: metadata.len(),
        })
    }
}

#[async_trait]
impl ImageFile for LocalImageFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self, max_bytes: u64) -> io::Result<Vec<u8>> {
        // The file may have grown since it was opened.
        let file = tokio::fs::File::open(&self.path).await?;
        let mut bytes = Vec::new();
        file.take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .await?;
        Ok(bytes)
    }
}

/// Image already held in memory, e.g. received from a browser upload.
#[derive(Debug, Clone)]
pub struct InMemoryImageFile {
    name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl InMemoryImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        InMemoryImageFile {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    /// Override the MIME type guessed from the file name.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[async_trait]
impl ImageFile for InMemoryImageFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| mime_type_for(&self.name))
    }

    async fn read(&self, max_bytes: u64) -> io::Result<Vec<u8>> {
        let cap = usize::try_from(max_bytes.saturating_add(1)).unwrap_or(usize::MAX);
        Ok(self.bytes[..self.bytes.len().min(cap)].to_vec())
    }
}

/// Guess an image MIME type from the file extension.
pub fn mime_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => FALLBACK_MIME,
    }
}

/// Encode bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime_type = if mime_type.is_empty() {
        FALLBACK_MIME
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Read `file` and return it as a data URL.
///
/// Files larger than `max_bytes` are rejected before any content is read.
/// The content actually read is checked against the same ceiling, since the
/// reported size can be stale.
///
/// # Errors
/// - [`FormError::FileTooLarge`] when the size exceeds `max_bytes`
/// - [`FormError::FileRead`] when reading fails
pub async fn encode_data_url(file: &dyn ImageFile, max_bytes: u64) -> Result<String, FormError> {
    let size = file.size();
    if size > max_bytes {
        debug!(
            "Rejecting {} ({} bytes, limit {} bytes)",
            file.name(),
            size,
            max_bytes
        );
        return Err(FormError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = file.read(max_bytes).await?;
    let read = bytes.len() as u64;
    if read > max_bytes {
        debug!(
            "Rejecting {} (read past its reported size of {} bytes, limit {} bytes)",
            file.name(),
            size,
            max_bytes
        );
        return Err(FormError::FileTooLarge {
            size: read,
            limit: max_bytes,
        });
    }
    debug!("Encoded {} ({} bytes)", file.name(), bytes.len());
    Ok(to_data_url(file.mime_type(), &bytes))
}
