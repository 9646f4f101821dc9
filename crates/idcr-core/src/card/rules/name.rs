//! Card holder name extraction.
//!
//! Names are the least structured field on the card. The extractor tries, in
//! order:
//!
//! 1. a labeled `Name: ...` value on a single line
//! 2. a line made of 1-4 capitalized words
//! 3. a capitalized word with up to two initials anywhere in the text
//! 4. a line scan over normalized lines, skipping issuer boilerplate and
//!    lines that carry another field's label
//!
//! Every candidate is checked against the name shape and rejected when it is
//! a field label, a gender token or issuer boilerplate.

use tracing::debug;

use super::normalize::normalize;
use super::patterns::{
    ADDRESS_CONTINUATION, FIELD_LABEL_LINE, HEADER_TEXT, NAME_AND_INITIAL, NAME_LABELED,
    NAME_LINE, NAME_LINE_SHAPE, NAME_SHAPE, NAME_WITH_INITIAL,
};
use super::{
    BARE_CONFIDENCE, ExtractionMatch, FALLBACK_CONFIDENCE, FieldExtractor, LABELED_CONFIDENCE,
};

/// Maximum accepted name length in characters.
pub const MAX_NAME_LENGTH: usize = 50;

/// Words that introduce another field. A name never ends with, or is
/// followed on its line by, one of these.
const LABEL_TOKENS: &[&str] = &[
    "name", "नाम", "dob", "date", "of", "birth", "year", "born", "gender", "sex", "address", "pin",
    "code", "pincode", "vid", "male", "female",
];

const GENDER_TOKENS: &[&str] = &["male", "female", "पुरुष", "महिला"];

const LINE_CONFIDENCE: f32 = 0.8;

/// Name extractor.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }

    fn labeled(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        for caps in NAME_LABELED.captures_iter(text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };

            let name = strip_trailing_labels(raw.as_str());
            if is_name_candidate(&name) {
                push_unique(
                    results,
                    ExtractionMatch::new(name, LABELED_CONFIDENCE, &caps[0])
                        .with_position(raw.start(), raw.end()),
                );
            } else {
                debug!("Rejected labeled name candidate: {:?}", raw.as_str());
            }
        }
    }

    fn whole_line(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        for caps in NAME_LINE.captures_iter(text) {
            let Some(m) = caps.get(1) else {
                continue;
            };

            let name = m.as_str().trim();
            if is_name_candidate(name) {
                push_unique(
                    results,
                    ExtractionMatch::new(name.to_string(), LINE_CONFIDENCE, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }
    }

    fn with_initial(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        for caps in NAME_WITH_INITIAL.captures_iter(text) {
            let Some(m) = caps.get(1) else {
                continue;
            };

            let name = m.as_str().trim();
            if !is_name_candidate(name) {
                continue;
            }

            // "Date of Birth", "Year of Birth": the capitalized word is a label
            let rest_of_line = text[m.end()..].split('\n').next().unwrap_or_default();
            if let Some(word) = first_word(rest_of_line) {
                if is_label_or_gender(&word) {
                    debug!("Rejected name candidate {:?} followed by {:?}", name, word);
                    continue;
                }
            }

            push_unique(
                results,
                ExtractionMatch::new(name.to_string(), BARE_CONFIDENCE, m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }
    }

    fn line_scan(&self, text: &str, results: &mut Vec<ExtractionMatch<String>>) {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        for (index, line) in lines.iter().enumerate() {
            let cleaned = normalize(line);

            if HEADER_TEXT.is_match(&cleaned) || FIELD_LABEL_LINE.is_match(&cleaned) {
                continue;
            }
            if has_gender_token(&cleaned) {
                continue;
            }

            let name_shaped = (NAME_LINE_SHAPE.is_match(&cleaned)
                && cleaned.chars().count() <= MAX_NAME_LENGTH)
                || NAME_AND_INITIAL.is_match(&cleaned);
            if !name_shaped {
                continue;
            }

            let before_address = lines
                .get(index + 1)
                .is_some_and(|next| ADDRESS_CONTINUATION.is_match(next));
            if before_address {
                debug!("Skipping name-shaped line {:?} followed by address text", cleaned);
                continue;
            }

            push_unique(
                results,
                ExtractionMatch::new(cleaned, FALLBACK_CONFIDENCE, *line),
            );
        }
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        self.labeled(text, &mut results);
        self.whole_line(text, &mut results);
        self.with_initial(text, &mut results);
        self.line_scan(text, &mut results);

        results
    }
}

/// Extract the card holder name from text.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::new().extract(text).map(|m| m.value)
}

fn push_unique(results: &mut Vec<ExtractionMatch<String>>, candidate: ExtractionMatch<String>) {
    if !results.iter().any(|r| r.value == candidate.value) {
        results.push(candidate);
    }
}

/// Name shape, length and rejection checks shared by every strategy.
fn is_name_candidate(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_NAME_LENGTH
        && NAME_SHAPE.is_match(name)
        && !FIELD_LABEL_LINE.is_match(name)
        && !HEADER_TEXT.is_match(name)
        && !has_gender_token(name)
}

fn has_gender_token(text: &str) -> bool {
    text.split_whitespace().any(|word| {
        GENDER_TOKENS
            .iter()
            .any(|token| word.eq_ignore_ascii_case(token) || word == *token)
    })
}

fn is_label_or_gender(word: &str) -> bool {
    let word = word.to_lowercase();
    LABEL_TOKENS.contains(&word.as_str()) || GENDER_TOKENS.contains(&word.as_str())
}

/// Drop trailing words that start another field ("Rajeev Kumar DOB").
fn strip_trailing_labels(raw: &str) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();

    while let Some(last) = words.last() {
        if is_label_or_gender(last) {
            words.pop();
        } else {
            break;
        }
    }

    words.join(" ")
}

/// First alphabetic word of a line fragment, skipping leading spaces and
/// punctuation.
fn first_word(fragment: &str) -> Option<String> {
    let word: String = fragment
        .trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();

    (!word.is_empty()).then_some(word)
}
