//! Identity card field extraction module.

mod document;
mod parser;
pub mod rules;

pub use document::looks_like_expected_document;
pub use parser::{CardParser, ExtractionResult};

use crate::error::ExtractionError;
use crate::models::record::ExtractedRecord;
use crate::ocr::OcrResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for card field extractors.
pub trait CardExtractor {
    /// Extract card fields from the front and back face text.
    fn extract(&self, front: &str, back: &str) -> Result<ExtractedRecord>;

    /// Extract card fields from OCR results.
    fn extract_from_ocr(&self, front: &OcrResult, back: &OcrResult) -> Result<ExtractedRecord> {
        self.extract(&front.text, &back.text)
    }
}
