//! Date of birth extraction.

use regex::Regex;

use super::patterns::{DATE_BARE, DOB_BIRTH, DOB_LABELED};
use super::{BARE_CONFIDENCE, ExtractionMatch, FieldExtractor, LABELED_CONFIDENCE};

/// Earliest accepted year of birth.
pub const MIN_YEAR: u32 = 1900;
/// Latest accepted year of birth.
pub const MAX_YEAR: u32 = 2025;

/// Date of birth extractor.
///
/// The value is returned exactly as printed on the card (`15/08/1990`,
/// `15-08-1990`, `15.08.1990`); no reformatting takes place.
pub struct DobExtractor;

impl DobExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DobExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DobExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let strategies: [(&Regex, f32); 3] = [
            (&DOB_LABELED, LABELED_CONFIDENCE),
            (&DOB_BIRTH, 0.85),
            (&DATE_BARE, BARE_CONFIDENCE),
        ];

        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in strategies {
            for caps in pattern.captures_iter(text) {
                let Some(date) = caps.get(1) else {
                    continue;
                };

                if !is_plausible_date(date.as_str())
                    || results.iter().any(|r| r.position == Some((date.start(), date.end())))
                {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(date.as_str().to_string(), confidence, &caps[0])
                        .with_position(date.start(), date.end()),
                );
            }
        }

        results
    }
}

/// Check that a `D/M/YYYY` style date has its parts in range.
///
/// Only ranges are checked: `31/02/1990` passes.
pub fn is_plausible_date(date: &str) -> bool {
    let parts: Vec<&str> = date.split(['/', '-', '.']).collect();
    if parts.len() != 3 {
        return false;
    }

    let (Ok(day), Ok(month), Ok(year)) = (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<u32>(),
    ) else {
        return false;
    };

    (1..=31).contains(&day) && (1..=12).contains(&month) && (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Extract the date of birth from text.
pub fn extract_dob(text: &str) -> Option<String> {
    DobExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_labeled() {
        assert_eq!(
            extract_dob("Rajeev Kumar\nDOB: 15/08/1990"),
            Some("15/08/1990".to_string())
        );
        assert_eq!(
            extract_dob("Date of Birth 01-01-1985"),
            Some("01-01-1985".to_string())
        );
        assert_eq!(
            extract_dob("जन्म तिथि / DOB : 2.3.2001"),
            Some("2.3.2001".to_string())
        );
    }

    #[test]
    fn test_labeled_preferred_over_bare() {
        let text = "Issued 10/10/2015\nDOB: 15/08/1990";
        assert_eq!(extract_dob(text), Some("15/08/1990".to_string()));
    }

    #[test]
    fn test_born_label() {
        assert_eq!(
            extract_dob("Year of Birth: 12/12/1970"),
            Some("12/12/1970".to_string())
        );
        assert_eq!(extract_dob("Born 5/6/1999"), Some("5/6/1999".to_string()));
    }

    #[test]
    fn test_month_13_never_returned() {
        assert_eq!(extract_dob("DOB: 15/13/1990"), None);
        assert_eq!(extract_dob("15/13/1990 and 31/12/1899"), None);
    }

    #[test]
    fn test_invalid_labeled_falls_through_to_bare() {
        let text = "DOB: 45/08/1990\nprinted 15/08/1990";
        assert_eq!(extract_dob(text), Some("15/08/1990".to_string()));
    }

    #[test]
    fn test_year_bounds() {
        assert!(is_plausible_date("01/01/1900"));
        assert!(is_plausible_date("31/12/2025"));
        assert!(!is_plausible_date("01/01/1899"));
        assert!(!is_plausible_date("01/01/2026"));
        assert!(!is_plausible_date("00/01/2000"));
        assert!(!is_plausible_date("01/00/2000"));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_dob("Name: Rajeev Kumar"), None);
        assert_eq!(extract_dob(""), None);
    }

    #[test]
    fn test_extract_all_skips_duplicates() {
        let results = DobExtractor::new().extract_all("DOB: 15/08/1990");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].confidence, LABELED_CONFIDENCE);
    }
}
