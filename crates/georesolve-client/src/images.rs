//! Image capture pipeline.
//!
//! Up to [`MAX_IMAGES`] images per complaint, each at most [`MAX_IMAGE_SIZE`]
//! bytes, encoded as base64 `data:` URLs. Files in a batch are read
//! concurrently and appended as each read completes, so the resulting order
//! may differ from the input order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use georesolve_shared::constants::{MAX_IMAGES, MAX_IMAGE_SIZE};
use georesolve_shared::{EncodedImage, ValidationError};

/// A file offered for upload. Size is known up front; bytes are read lazily.
#[async_trait]
pub trait ImageSource: Send + Sync {
    fn name(&self) -> &str;

    fn size(&self) -> u64;

    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

/// An image on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileImage {
    path: PathBuf,
    name: String,
    size: u64,
}

impl FileImage {
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let size = tokio::fs::metadata(&path).await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { path, name, size })
    }
}

#[async_trait]
impl ImageSource for FileImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// The whole batch was refused; nothing was read and nothing changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestRejection {
    #[error("You can upload maximum 3 images")]
    TooMany { current: usize, incoming: usize },
}

impl From<IngestRejection> for ValidationError {
    fn from(rejection: IngestRejection) -> Self {
        match rejection {
            IngestRejection::TooMany { .. } => ValidationError::TooManyImages { max: MAX_IMAGES },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("Image size should be less than 5MB")]
    TooLarge { size: u64 },

    #[error("Could not read image: {0}")]
    Unreadable(String),
}

/// A file left out of an otherwise accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: usize,
    pub skipped: Vec<Skipped>,
}

/// Images staged on the report form.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<EncodedImage>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_vec(self) -> Vec<EncodedImage> {
        self.images
    }

    /// Add a batch of files.
    ///
    /// The count check covers the whole batch, oversized files included, and
    /// runs before anything is read. Oversized or unreadable files are
    /// skipped individually.
    pub async fn ingest(
        &mut self,
        files: &[Box<dyn ImageSource>],
    ) -> Result<IngestReport, IngestRejection> {
        if self.images.len() + files.len() > MAX_IMAGES {
            warn!(current = self.images.len(), incoming = files.len(), "image batch rejected");
            return Err(IngestRejection::TooMany {
                current: self.images.len(),
                incoming: files.len(),
            });
        }

        let mut report = IngestReport::default();
        let mut reads = FuturesUnordered::new();
        for file in files {
            if file.size() > MAX_IMAGE_SIZE {
                report.skipped.push(Skipped {
                    name: file.name().to_string(),
                    reason: SkipReason::TooLarge { size: file.size() },
                });
                continue;
            }
            reads.push(async move { (file.name(), file.read().await) });
        }

        while let Some((name, result)) = reads.next().await {
            match result {
                Ok(bytes) => {
                    debug!(name, bytes = bytes.len(), "image encoded");
                    self.images.push(encode(name, &bytes));
                    report.accepted += 1;
                }
                Err(e) => {
                    warn!(name, error = %e, "image read failed");
                    report.skipped.push(Skipped {
                        name: name.to_string(),
                        reason: SkipReason::Unreadable(e.to_string()),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Drop the image at `index`, keeping the others in order.
    pub fn remove(&mut self, index: usize) -> Option<EncodedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }
}

/// Encode bytes as a `data:` URL.
pub fn encode(name: &str, bytes: &[u8]) -> EncodedImage {
    EncodedImage(format!(
        "data:{};base64,{}",
        sniff_mime(name, bytes),
        STANDARD.encode(bytes)
    ))
}

fn sniff_mime(name: &str, bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => return "image/png",
        [0xFF, 0xD8, 0xFF, ..] => return "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => return "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => return "image/webp",
        _ => {}
    }
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
