//! Structural validation of identity numbers and postal codes.

/// Length of a valid identity number.
pub const ID_NUMBER_LENGTH: usize = 12;

/// Length of a valid postal code.
pub const POSTAL_CODE_LENGTH: usize = 6;

/// Validate an identity number: exactly 12 digits once separators are removed.
///
/// No checksum is applied.
pub fn is_valid_id_number(value: &str) -> bool {
    digits(value).len() == ID_NUMBER_LENGTH
}

/// Validate a postal code: exactly 6 digits, the first of them 1-8.
///
/// Leading 0 and 9 are not assigned to any postal region.
pub fn is_valid_postal_code(value: &str) -> bool {
    let digits = digits(value);
    digits.len() == POSTAL_CODE_LENGTH && matches!(digits.as_bytes()[0], b'1'..=b'8')
}

/// Keep only ASCII digits.
pub fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_number_valid() {
        assert!(is_valid_id_number("123456789123"));
        assert!(is_valid_id_number("1234 5678 9123"));
        assert!(is_valid_id_number("1234-5678-9123"));
    }

    #[test]
    fn test_id_number_invalid() {
        assert!(!is_valid_id_number("12345678912")); // 11 digits
        assert!(!is_valid_id_number("1234567891234")); // 13 digits
        assert!(!is_valid_id_number(""));
        assert!(!is_valid_id_number("abcdefghijkl"));
    }

    #[test]
    fn test_id_number_every_length() {
        for len in 0..20 {
            let value = "7".repeat(len);
            assert_eq!(is_valid_id_number(&value), len == 12, "length {}", len);
        }
    }

    #[test]
    fn test_postal_code_leading_digit() {
        for first in 0..=9u8 {
            let value = format!("{}60001", first);
            assert_eq!(
                is_valid_postal_code(&value),
                (1..=8).contains(&first),
                "postal code {}",
                value
            );
        }
    }

    #[test]
    fn test_postal_code_length() {
        assert!(is_valid_postal_code("560001"));
        assert!(is_valid_postal_code("560 001"));
        assert!(!is_valid_postal_code("56001"));
        assert!(!is_valid_postal_code("5600011"));
        assert!(!is_valid_postal_code(""));
    }

    #[test]
    fn test_non_ascii_digits_are_ignored() {
        // Devanagari digits are not accepted as identity digits.
        assert!(!is_valid_id_number("१२३४५६७८९१२३"));
    }
}
