//! Uploaded face images and their validation.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::InputError;
use crate::models::config::UploadConfig;
use crate::models::record::Face;

/// A face image handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Location of the image on disk.
    pub path: PathBuf,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl UploadedImage {
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Describe a local image file, deriving the MIME type from its extension.
    ///
    /// Unknown extensions get `application/octet-stream` and fail validation.
    pub fn from_path(face: Face, path: &Path) -> Result<Self, InputError> {
        let metadata = std::fs::metadata(path).map_err(|_| InputError::FileNotFound {
            face,
            path: path.to_path_buf(),
        })?;

        let mime_type = mime_type_for_path(path).unwrap_or("application/octet-stream");

        Ok(Self::new(path, mime_type, metadata.len()))
    }

    /// Check MIME type and size against the upload limits.
    pub fn validate(&self, face: Face, config: &UploadConfig) -> Result<(), InputError> {
        let mime_type = self.mime_type.trim().to_ascii_lowercase();
        if !config
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&mime_type))
        {
            return Err(InputError::UnsupportedMimeType {
                face,
                mime_type: self.mime_type.clone(),
            });
        }

        if self.size_bytes > config.max_file_size {
            return Err(InputError::FileTooLarge {
                face,
                size_bytes: self.size_bytes,
                limit_bytes: config.max_file_size,
            });
        }

        Ok(())
    }
}

/// MIME type of an image file by extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// Check that both faces were supplied.
pub fn require_both<T>(front: Option<T>, back: Option<T>) -> Result<(T, T), InputError> {
    match (front, back) {
        (Some(front), Some(back)) => Ok((front, back)),
        (None, _) => Err(InputError::MissingFace(Face::Front)),
        (_, None) => Err(InputError::MissingFace(Face::Back)),
    }
}

/// An uploaded image written to a temporary file.
///
/// The file is removed when the value is dropped.
pub struct TempUpload {
    file: NamedTempFile,
    image: UploadedImage,
}

impl TempUpload {
    /// Write `bytes` to a new temporary file in `dir`.
    pub fn write(dir: &Path, face: Face, mime_type: &str, bytes: &[u8]) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;

        let suffix = match mime_type {
            "image/jpeg" => ".jpg",
            "image/png" => ".png",
            _ => ".upload",
        };

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", face))
            .suffix(suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        let image = UploadedImage::new(file.path(), mime_type, bytes.len() as u64);

        Ok(Self { file, image })
    }

    pub fn image(&self) -> &UploadedImage {
        &self.image
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
