//! Document gate: does a face plausibly show an identity card?

use super::rules::patterns::{DOCUMENT_KEYWORDS, has_id_shape};

/// True if the text mentions the issuer or carries an identity-number shape.
///
/// Only the shape of the number is checked, so an 11-digit misread still
/// passes the gate.
pub fn looks_like_expected_document(text: &str) -> bool {
    DOCUMENT_KEYWORDS.is_match(text) || has_id_shape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert!(looks_like_expected_document("GOVERNMENT OF INDIA"));
        assert!(looks_like_expected_document("Aadhaar - Aam Aadmi ka Adhikar"));
        assert!(looks_like_expected_document("Unique Identification Authority"));
        assert!(looks_like_expected_document("www.uidai.gov.in"));
        assert!(looks_like_expected_document("भारत सरकार"));
        assert!(looks_like_expected_document("मेरा आधार, मेरी पहचान"));
    }

    #[test]
    fn test_id_shapes() {
        assert!(looks_like_expected_document("1234 5678 9123"));
        assert!(looks_like_expected_document("123456789123"));
        assert!(looks_like_expected_document("1234-5678-9123"));
    }

    #[test]
    fn test_unrelated_text() {
        assert!(!looks_like_expected_document("Address: 12 MG Road, City\nMale\n560001"));
        assert!(!looks_like_expected_document("Invoice no 12345"));
        assert!(!looks_like_expected_document(""));
    }

    #[test]
    fn test_digit_groups_on_separate_lines_are_not_an_id() {
        assert!(!looks_like_expected_document("Ref 1234\n5678\n9123"));
        assert!(!looks_like_expected_document("Year 1990\n1234-5678"));
    }
}
