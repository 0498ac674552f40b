use std::path::{Path, PathBuf};

use thiserror::Error;

use super::post::MediaKind;

/// Errors that can occur when reading an attachment from disk.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read attachment '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported attachment type for '{path}'")]
    UnsupportedType { path: PathBuf },
}

/// Opaque media descriptor forwarded to the create-post endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Load an attachment from a file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let mime_type = mime_for_path(path).ok_or_else(|| AttachmentError::UnsupportedType {
            path: path.to_path_buf(),
        })?;
        let bytes = std::fs::read(path).map_err(|e| AttachmentError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, mime_type, bytes))
    }

    /// Media kind implied by the MIME type.
    pub fn kind(&self) -> MediaKind {
        if self.mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}
