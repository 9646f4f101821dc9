//! OCR text cleanup.

/// Replace noise characters with spaces, collapse whitespace runs and trim.
///
/// Letters, digits, whitespace and `/ : . -` survive. Idempotent.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '/' | ':' | '.' | '-')
}

/// Collapse whitespace runs into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
