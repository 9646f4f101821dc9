//! Configuration structures for the card pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::IdcrError;

/// Characters the OCR engine is allowed to emit.
pub const DEFAULT_CHAR_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,:/()-";

/// Main configuration for the idcr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdcrConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Card extraction configuration.
    pub extraction: ExtractionConfig,

    /// Upload limits.
    pub upload: UploadConfig,

    /// Record storage.
    pub storage: StorageConfig,

    /// HTTP server.
    pub server: ServerConfig,
}

/// Which OCR engine to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    /// Pure Rust ONNX engine (`native` feature).
    #[default]
    Onnx,
    /// Tesseract via leptess (`tesseract` feature).
    Tesseract,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine backend.
    pub backend: OcrBackendKind,

    /// Recognition language (Tesseract language code).
    pub language: String,

    /// Characters the engine may emit; others are dropped.
    pub char_whitelist: String,

    /// Tesseract page segmentation mode (3 = fully automatic).
    pub page_segmentation_mode: u32,

    /// Keep runs of spaces between words.
    pub preserve_interword_spaces: bool,

    /// Keep `[UNK]` tokens emitted by the ONNX recognizer.
    pub keep_unk: bool,

    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::default(),
            language: "eng".to_string(),
            char_whitelist: DEFAULT_CHAR_WHITELIST.to_string(),
            page_segmentation_mode: 3,
            preserve_interword_spaces: true,
            keep_unk: false,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

/// Card extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject faces that do not look like an identity card.
    pub require_document_match: bool,
}

/// Upload validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum size of a single face image in bytes.
    pub max_file_size: u64,

    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,

    /// Directory for temporary upload files.
    pub upload_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            allowed_mime_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist records to SQLite. When false, records are kept in memory.
    pub enabled: bool,

    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: PathBuf::from("idcr.sqlite3"),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Include error details in 500 responses (development only).
    pub expose_error_details: bool,

    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            expose_error_details: false,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl IdcrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, IdcrError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| IdcrError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| IdcrError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), IdcrError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| IdcrError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| IdcrError::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_path(model_name)
    }

    /// Apply deployment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply deployment overrides from an arbitrary key lookup.
    ///
    /// Recognized keys: `PORT`, `IDCR_DATABASE`, `IDCR_SKIP_DATABASE`, `IDCR_ENV`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(path) = lookup("IDCR_DATABASE") {
            self.storage.database_path = PathBuf::from(path);
        }
        if lookup("IDCR_SKIP_DATABASE").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            self.storage.enabled = false;
        }
        if lookup("IDCR_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development")) {
            self.server.expose_error_details = true;
        }
    }
}
