//! Identity number (12 digits) extraction.

use regex::Regex;

use super::patterns::{ID_CONTIGUOUS, ID_GROUPED, ID_SPACED};
use super::validate::{digits, is_valid_id_number};
use super::{BARE_CONFIDENCE, ExtractionMatch, FieldExtractor};

/// Identity number extractor.
///
/// Tries the space-grouped `4 4 4` shape, then 12 contiguous digits, then
/// hyphen or space grouped digits. Every occurrence of a shape is checked
/// before moving on to the next shape.
pub struct IdNumberExtractor;

impl IdNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let shapes: [(&Regex, f32); 3] = [
            (&ID_SPACED, 0.9),
            (&ID_CONTIGUOUS, 0.85),
            (&ID_GROUPED, BARE_CONFIDENCE),
        ];

        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in shapes {
            for m in pattern.find_iter(text) {
                let number = digits(m.as_str());

                if !is_valid_id_number(&number) || results.iter().any(|r| r.value == number) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(number, confidence, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Extract the identity number from text, separators removed.
pub fn extract_id_number(text: &str) -> Option<String> {
    IdNumberExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spaced() {
        let text = "Rajeev Kumar\n1234 5678 9123\nDOB: 15/08/1990";
        assert_eq!(extract_id_number(text), Some("123456789123".to_string()));
    }

    #[test]
    fn test_extract_contiguous() {
        assert_eq!(
            extract_id_number("Aadhaar No 987654321098"),
            Some("987654321098".to_string())
        );
    }

    #[test]
    fn test_extract_hyphenated() {
        assert_eq!(
            extract_id_number("UID: 4321-8765-2109"),
            Some("432187652109".to_string())
        );
    }

    #[test]
    fn test_eleven_digits_rejected() {
        assert_eq!(extract_id_number("1234 5678 912"), None);
        assert_eq!(extract_id_number("12345678912"), None);
    }

    #[test]
    fn test_spaced_shape_preferred() {
        let extractor = IdNumberExtractor::new();
        let results = extractor.extract_all("111122223333 and 4444 5555 6666");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, "444455556666");
        assert_eq!(results[1].value, "111122223333");
    }

    #[test]
    fn test_groups_do_not_span_lines() {
        let text = "DOB: 15/08/1990\n1234 5678 9123";
        assert_eq!(extract_id_number(text), Some("123456789123".to_string()));
        assert!(
            IdNumberExtractor::new()
                .extract_all(text)
                .iter()
                .all(|m| !m.source.contains('\n'))
        );
        assert_eq!(extract_id_number("1990\n1234-5678"), None);
    }

    #[test]
    fn test_position_recorded() {
        let text = "No: 1234 5678 9123";
        let m = IdNumberExtractor::new().extract(text).unwrap();
        assert_eq!(m.position, Some((4, 18)));
        assert_eq!(m.source, "1234 5678 9123");
    }
}
