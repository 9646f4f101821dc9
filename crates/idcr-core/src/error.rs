//! Error types for the idcr-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::record::Face;

/// Main error type for the idcr library.
#[derive(Error, Debug)]
pub enum IdcrError {
    /// Rejected upload (missing face, wrong type, too large).
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Card extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Record storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration file could not be read, parsed or written.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the upload boundary, before any OCR work starts.
#[derive(Error, Debug)]
pub enum InputError {
    /// A face image was not supplied.
    #[error("missing {0} image")]
    MissingFace(Face),

    /// The image MIME type is not accepted.
    #[error("unsupported MIME type for {face} image: {mime_type}")]
    UnsupportedMimeType { face: Face, mime_type: String },

    /// The image exceeds the configured size limit.
    #[error("{face} image is {size_bytes} bytes, limit is {limit_bytes}")]
    FileTooLarge {
        face: Face,
        size_bytes: u64,
        limit_bytes: u64,
    },

    /// The image file does not exist on disk.
    #[error("{face} image file not found: {path}")]
    FileNotFound { face: Face, path: PathBuf },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to start or configure the recognition engine.
    #[error("failed to start engine: {0}")]
    EngineStart(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to card field extraction.
///
/// Missing fields are never errors; they surface as `Field::NotFound`.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document gate rejected a face.
    #[error("{face} image does not look like an identity card")]
    DocumentMismatch { face: Face },
}

/// Errors related to record persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database.
    #[error("failed to open store: {0}")]
    Open(String),

    /// Failed to write a record.
    #[error("failed to write record: {0}")]
    Write(String),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for the idcr library.
pub type Result<T> = std::result::Result<T, IdcrError>;
