//! One card, end to end: validate, recognize, extract, persist.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::card::CardParser;
use crate::error::Result;
use crate::models::config::UploadConfig;
use crate::models::record::{CardRecord, Face};
use crate::ocr::{OcrBackend, ScopedWorker};
use crate::store::RecordStore;
use crate::upload::UploadedImage;

/// Card processing service.
///
/// All collaborators are injected; the service holds no global state and is
/// shared across requests.
pub struct CardService {
    backend: Arc<dyn OcrBackend>,
    parser: CardParser,
    store: Arc<dyn RecordStore>,
    upload: UploadConfig,
}

impl CardService {
    pub fn new(backend: Arc<dyn OcrBackend>, parser: CardParser, store: Arc<dyn RecordStore>) -> Self {
        Self {
            backend,
            parser,
            store,
            upload: UploadConfig::default(),
        }
    }

    /// Set the upload limits applied before recognition.
    pub fn with_upload_limits(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Process one card.
    ///
    /// Both images are validated before an OCR worker is started. The worker
    /// recognizes the front face, then the back face, and is released before
    /// this returns, whatever the outcome. A failed save is logged and the
    /// record is returned anyway.
    pub fn process(&self, front: &UploadedImage, back: &UploadedImage) -> Result<CardRecord> {
        let start = Instant::now();

        for (face, image) in [(Face::Front, front), (Face::Back, back)] {
            image.validate(face, &self.upload)?;
            if !image.path.exists() {
                return Err(crate::error::InputError::FileNotFound {
                    face,
                    path: image.path.clone(),
                }
                .into());
            }
        }

        let (front_ocr, back_ocr) = {
            let mut worker = ScopedWorker::start(self.backend.as_ref())?;

            info!("Processing front image");
            let front_ocr = worker.recognize(&front.path)?;

            info!("Processing back image");
            let back_ocr = worker.recognize(&back.path)?;

            (front_ocr, back_ocr)
        };

        debug!("Front OCR text: {:?}", front_ocr.text);
        debug!("Back OCR text: {:?}", back_ocr.text);

        let extraction = self.parser.parse(&front_ocr.text, &back_ocr.text)?;
        for warning in &extraction.warnings {
            debug!("{}", warning);
        }

        let record = CardRecord::new(extraction.record);

        if let Err(e) = self.store.save(&record) {
            warn!(
                "Failed to save record {} to {} store: {}",
                record.id,
                self.store.name(),
                e
            );
        }

        info!(
            "Processed card {} in {}ms ({} fields missing)",
            record.id,
            start.elapsed().as_millis(),
            extraction.warnings.len()
        );

        Ok(record)
    }
}
