//! Tesseract backend via `leptess`.

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use leptess::{LepTess, Variable};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrBackend, OcrResult, OcrWorker};

/// Tesseract backend. Each worker owns a fresh Tesseract instance.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Check that Tesseract initializes with the configured language.
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        LepTess::new(None, &config.language).map_err(|e| {
            OcrError::EngineStart(format!(
                "Tesseract failed to initialize with language '{}': {}",
                config.language, e
            ))
        })?;

        Ok(Self { config })
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn start(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        let mut api = LepTess::new(None, &self.config.language)
            .map_err(|e| OcrError::EngineStart(format!("Tesseract: {}", e)))?;

        let settings = [
            (
                Variable::TesseditCharWhitelist,
                self.config.char_whitelist.clone(),
            ),
            (
                Variable::TesseditPagesegMode,
                self.config.page_segmentation_mode.to_string(),
            ),
            (
                Variable::PreserveInterwordSpaces,
                if self.config.preserve_interword_spaces { "1" } else { "0" }.to_string(),
            ),
        ];

        for (variable, value) in settings {
            api.set_variable(variable, &value).map_err(|e| {
                OcrError::EngineStart(format!("Tesseract parameter rejected: {}", e))
            })?;
        }

        debug!("Tesseract worker initialized for '{}'", self.config.language);

        Ok(Box::new(TesseractWorker { api }))
    }
}

struct TesseractWorker {
    api: LepTess,
}

impl OcrWorker for TesseractWorker {
    fn recognize(&mut self, path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let bytes = std::fs::read(path)
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?;
        let (width, height) = image::load_from_memory(&bytes)
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?
            .dimensions();

        self.api
            .set_image_from_mem(&bytes)
            .map_err(|e| OcrError::InvalidImage(format!("Tesseract: {}", e)))?;

        let text = self
            .api
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(format!("Tesseract: {}", e)))?;
        let confidence = self.api.mean_text_conf() as f32 / 100.0;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Tesseract recognized {} characters in {}ms",
            text.len(),
            processing_time_ms
        );

        Ok(OcrResult {
            boxes: Vec::new(),
            text,
            confidence: Some(confidence),
            processing_time_ms,
            image_size: (width, height),
        })
    }
}
