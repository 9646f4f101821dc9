//! Two-face card parser.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::record::{ExtractedRecord, Face};

use super::document::looks_like_expected_document;
use super::rules::{
    extract_address, extract_dob, extract_gender, extract_id_number, extract_name,
    extract_postal_code,
};
use super::{CardExtractor, Result};

/// Result of card extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: ExtractedRecord,
    /// Raw front face text.
    pub front_text: String,
    /// Raw back face text.
    pub back_text: String,
    /// One warning per field that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based parser for the front and back text of an identity card.
///
/// Field sources are fixed: the name comes from the front face (back as a
/// fallback), the address from the back face (front as a fallback), and every
/// other field from both faces joined with a newline.
pub struct CardParser {
    /// Reject faces without issuer keywords or an identity-number shape.
    require_document_match: bool,
}

impl CardParser {
    /// Create a parser with the document gate disabled.
    pub fn new() -> Self {
        Self {
            require_document_match: false,
        }
    }

    /// Enable or disable the document gate.
    pub fn with_document_check(mut self, enabled: bool) -> Self {
        self.require_document_match = enabled;
        self
    }

    /// Parse both faces into a record plus extraction diagnostics.
    pub fn parse(&self, front: &str, back: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!(
            "Parsing card from {} front and {} back characters",
            front.len(),
            back.len()
        );

        if self.require_document_match {
            for (face, text) in [(Face::Front, front), (Face::Back, back)] {
                if !looks_like_expected_document(text) {
                    warn!("Document gate rejected {} face", face);
                    return Err(ExtractionError::DocumentMismatch { face });
                }
            }
        }

        let combined = format!("{}\n{}", front, back);

        let record = ExtractedRecord {
            name: extract_name(front).or_else(|| extract_name(back)).into(),
            id_number: extract_id_number(&combined).into(),
            date_of_birth: extract_dob(&combined).into(),
            address: extract_address(back).or_else(|| extract_address(front)).into(),
            gender: extract_gender(&combined).into(),
            postal_code: extract_postal_code(&combined).into(),
        };

        let warnings: Vec<String> = record
            .missing_fields()
            .into_iter()
            .map(|field| format!("Could not extract {}", field))
            .collect();

        debug!(
            "Extracted card record with {} of 6 fields",
            6 - warnings.len()
        );

        Ok(ExtractionResult {
            record,
            front_text: front.to_string(),
            back_text: back.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for CardParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CardExtractor for CardParser {
    fn extract(&self, front: &str, back: &str) -> Result<ExtractedRecord> {
        self.parse(front, back).map(|r| r.record)
    }
}
