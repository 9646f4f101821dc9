//! Rule-based field extractors for identity cards.
//!
//! Every extractor tries its strategies in a fixed order (labeled, then
//! shape-only, then positional fallback) and never fails: a field that cannot
//! be located is simply absent.

pub mod address;
pub mod dob;
pub mod gender;
pub mod id_number;
pub mod name;
pub mod normalize;
pub mod patterns;
pub mod postal;
pub mod validate;

pub use address::{extract_address, AddressExtractor};
pub use dob::{extract_dob, DobExtractor};
pub use gender::{extract_gender, normalize_gender, GenderExtractor};
pub use id_number::{extract_id_number, IdNumberExtractor};
pub use name::{extract_name, NameExtractor};
pub use normalize::{collapse_whitespace, normalize};
pub use postal::{extract_postal_code, PostalCodeExtractor};
pub use validate::{is_valid_id_number, is_valid_postal_code};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in strategy order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Confidence for a value found behind its field label.
pub(crate) const LABELED_CONFIDENCE: f32 = 0.95;
/// Confidence for a value found by shape alone.
pub(crate) const BARE_CONFIDENCE: f32 = 0.7;
/// Confidence for a value found by positional fallback.
pub(crate) const FALLBACK_CONFIDENCE: f32 = 0.5;
