//! Postal code (PIN) extraction.

use regex::Regex;

use super::patterns::{PIN_BARE, PIN_LABELED};
use super::validate::is_valid_postal_code;
use super::{BARE_CONFIDENCE, ExtractionMatch, FieldExtractor, LABELED_CONFIDENCE};

/// Postal code extractor.
pub struct PostalCodeExtractor;

impl PostalCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PostalCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PostalCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let strategies: [(&Regex, f32); 2] = [
            (&PIN_LABELED, LABELED_CONFIDENCE),
            (&PIN_BARE, BARE_CONFIDENCE),
        ];

        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in strategies {
            for caps in pattern.captures_iter(text) {
                let Some(code) = caps.get(1) else {
                    continue;
                };

                if !is_valid_postal_code(code.as_str())
                    || results.iter().any(|r| r.position == Some((code.start(), code.end())))
                {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(code.as_str().to_string(), confidence, &caps[0])
                        .with_position(code.start(), code.end()),
                );
            }
        }

        results
    }
}

/// Extract the postal code from text.
pub fn extract_postal_code(text: &str) -> Option<String> {
    PostalCodeExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare() {
        assert_eq!(
            extract_postal_code("12 MG Road, City\nMale\n560001"),
            Some("560001".to_string())
        );
    }

    #[test]
    fn test_extract_labeled_preferred() {
        let text = "House 110022 Block\nPIN Code: 400001";
        assert_eq!(extract_postal_code(text), Some("400001".to_string()));
    }

    #[test]
    fn test_leading_digit_rejected() {
        assert_eq!(extract_postal_code("912345"), None);
        assert_eq!(extract_postal_code("PIN: 012345"), None);
    }

    #[test]
    fn test_invalid_first_candidate_skipped() {
        assert_eq!(
            extract_postal_code("912345 then 682001"),
            Some("682001".to_string())
        );
    }

    #[test]
    fn test_id_number_not_mistaken_for_postal_code() {
        assert_eq!(extract_postal_code("1234 5678 9123"), None);
        assert_eq!(extract_postal_code("123456789123"), None);
    }
}
