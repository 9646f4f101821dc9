//! Address extraction.

use super::normalize::{collapse_whitespace, normalize};
use super::patterns::{
    ADDRESS_LABEL, DATE_BARE, GENDER_ONLY, HEADER_TEXT, PIN_ONLY, RELATION_PREFIX, has_id_shape,
};
use super::{ExtractionMatch, FALLBACK_CONFIDENCE, FieldExtractor, LABELED_CONFIDENCE};

/// Accepted address length range (exclusive on both ends).
pub const MIN_ADDRESS_LENGTH: usize = 10;
pub const MAX_ADDRESS_LENGTH: usize = 200;

/// Accepted fallback line length range (exclusive), measured after
/// normalization.
const MIN_LINE_LENGTH: usize = 5;
const MAX_LINE_LENGTH: usize = 100;

/// Lines joined by the fallback.
const MAX_FALLBACK_LINES: usize = 4;

const RELATION_CONFIDENCE: f32 = 0.85;

/// Address extractor.
///
/// A labeled address runs from the label to the first blank line, the end of
/// the text, or the first line that holds another field on its own (an ID
/// number, a date, a gender word, issuer boilerplate or a bare postal code).
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }

    fn labeled(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        for label in ADDRESS_LABEL.find_iter(text) {
            let rest = text[label.end()..].trim_start();

            let mut parts: Vec<&str> = Vec::new();
            for (index, line) in rest.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                if index > 0 && is_other_field_line(&normalize(line)) {
                    break;
                }
                parts.push(line);
            }

            let address = collapse_whitespace(&parts.join(" "));
            if has_address_length(&address) {
                results.push(
                    ExtractionMatch::new(address, LABELED_CONFIDENCE, label.as_str())
                        .with_position(label.start(), label.end()),
                );
            }
        }
    }

    fn relation(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        for caps in RELATION_PREFIX.captures_iter(text) {
            let Some(m) = caps.get(1) else {
                continue;
            };

            let address = collapse_whitespace(m.as_str());
            if has_address_length(&address) {
                results.push(
                    ExtractionMatch::new(address, RELATION_CONFIDENCE, &caps[0])
                        .with_position(m.start(), m.end()),
                );
            }
        }
    }

    fn fallback(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| {
                let cleaned = normalize(line);
                let length = cleaned.chars().count();
                length > MIN_LINE_LENGTH
                    && length < MAX_LINE_LENGTH
                    && !is_other_field_line(&cleaned)
            })
            .take(MAX_FALLBACK_LINES)
            .collect();

        if !lines.is_empty() {
            let source = lines.join("\n");
            results.push(ExtractionMatch::new(
                lines.join(", "),
                FALLBACK_CONFIDENCE,
                source,
            ));
        }
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        self.labeled(text, &mut results);
        self.relation(text, &mut results);
        self.fallback(text, &mut results);

        results
    }
}

/// Extract the address from text.
pub fn extract_address(text: &str) -> Option<String> {
    AddressExtractor::new().extract(text).map(|m| m.value)
}

fn has_address_length(address: &str) -> bool {
    let length = address.chars().count();
    length > MIN_ADDRESS_LENGTH && length < MAX_ADDRESS_LENGTH
}

/// A normalized line that carries some other field and nothing else an
/// address would need.
fn is_other_field_line(cleaned: &str) -> bool {
    has_id_shape(cleaned)
        || DATE_BARE.is_match(cleaned)
        || GENDER_ONLY.is_match(cleaned)
        || HEADER_TEXT.is_match(cleaned)
        || PIN_ONLY.is_match(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_stops_at_gender_line() {
        let text = "Address: 12 MG Road, City\nMale\n560001";
        assert_eq!(extract_address(text), Some("12 MG Road, City".to_string()));
    }

    #[test]
    fn test_labeled_multi_line() {
        let text = "Address: S/O Ramesh Kumar,\n12 MG Road,\nBengaluru, Karnataka\n560001";
        assert_eq!(
            extract_address(text),
            Some("S/O Ramesh Kumar, 12 MG Road, Bengaluru, Karnataka".to_string())
        );
    }

    #[test]
    fn test_labeled_stops_at_blank_line() {
        let text = "पता: 12 MG Road,\nCity\n\nHelpline 1947";
        assert_eq!(extract_address(text), Some("12 MG Road, City".to_string()));
    }

    #[test]
    fn test_short_label_falls_back_to_relation() {
        let text = "Address: Flat 2\n\nW/O Anil, Sector 5, Noida";
        assert_eq!(
            extract_address(text),
            Some("Anil, Sector 5, Noida".to_string())
        );
    }

    #[test]
    fn test_relation_prefix() {
        let text = "S/O: Ramesh Kumar, 45 Park Street, Kolkata";
        assert_eq!(
            extract_address(text),
            Some("Ramesh Kumar, 45 Park Street, Kolkata".to_string())
        );
    }

    #[test]
    fn test_fallback_filters_other_fields() {
        let text = "GOVERNMENT OF INDIA\n1234 5678 9123\n15/08/1990\nMale\n\
                    House 7, Gandhi Nagar\nJaipur Rajasthan\n302001";
        assert_eq!(
            extract_address(text),
            Some("House 7, Gandhi Nagar, Jaipur Rajasthan".to_string())
        );
    }

    #[test]
    fn test_fallback_takes_four_lines() {
        let text = "Line one here\nLine two here\nLine three here\nLine four here\nLine five here";
        assert_eq!(
            extract_address(text),
            Some("Line one here, Line two here, Line three here, Line four here".to_string())
        );
    }

    #[test]
    fn test_overlong_text_is_not_an_address() {
        let text = format!("Address: {}", "x".repeat(250));
        assert_eq!(extract_address(&text), None);
    }

    #[test]
    fn test_noise_has_no_address() {
        assert_eq!(extract_address("@@@ ###\n!!"), None);
        assert_eq!(extract_address(""), None);
    }
}
