//! Gender extraction.

use regex::Regex;

use super::patterns::{GENDER_BARE, GENDER_LABELED};
use super::{BARE_CONFIDENCE, ExtractionMatch, FieldExtractor, LABELED_CONFIDENCE};

pub const MALE: &str = "Male";
pub const FEMALE: &str = "Female";

/// Gender extractor. Output is always `Male` or `Female`.
pub struct GenderExtractor;

impl GenderExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GenderExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let strategies: [(&Regex, f32); 2] = [
            (&GENDER_LABELED, LABELED_CONFIDENCE),
            (&GENDER_BARE, BARE_CONFIDENCE),
        ];

        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in strategies {
            for caps in pattern.captures_iter(text) {
                let Some(token) = caps.get(1) else {
                    continue;
                };
                let Some(gender) = normalize_gender(token.as_str()) else {
                    continue;
                };

                if results.iter().any(|r| r.position == Some((token.start(), token.end()))) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(gender.to_string(), confidence, &caps[0])
                        .with_position(token.start(), token.end()),
                );
            }
        }

        results
    }
}

/// Map a recognized gender token to `Male` or `Female`.
///
/// The female family is checked first: `female` contains an `m`.
pub fn normalize_gender(token: &str) -> Option<&'static str> {
    let token = token.trim().to_lowercase();

    if token.starts_with('f') || token.contains("महिला") {
        Some(FEMALE)
    } else if token.starts_with('m') || token.contains("पुरुष") {
        Some(MALE)
    } else {
        None
    }
}

/// Extract gender from text.
pub fn extract_gender(text: &str) -> Option<String> {
    GenderExtractor::new().extract(text).map(|m| m.value)
}
