//! Common regex patterns for identity card extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Name patterns
    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Name|नाम)\s*:?\s*([A-Za-z][A-Za-z \t]{1,49})"
    ).unwrap();

    pub static ref NAME_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]*){0,3})[ \t\r]*$"
    ).unwrap();

    pub static ref NAME_WITH_INITIAL: Regex = Regex::new(
        r"\b([A-Z][a-z]+(?:[ \t]+[A-Z]\.?){0,2})\b"
    ).unwrap();

    pub static ref NAME_SHAPE: Regex = Regex::new(
        r"^[A-Z](?:[a-z]*|[A-Z]*)(?:\s+[A-Z](?:[a-z]*|[A-Z]*)){0,3}(?:\s+[A-Z]\.?)?$"
    ).unwrap();

    pub static ref NAME_LINE_SHAPE: Regex = Regex::new(
        r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]*){0,2}(?:\s+[A-Z]\.?)?$"
    ).unwrap();

    pub static ref NAME_AND_INITIAL: Regex = Regex::new(
        r"(?i)^[A-Z][a-z]+\s+[A-Z]\.?$"
    ).unwrap();

    // Lines that carry another field's label
    pub static ref FIELD_LABEL_LINE: Regex = Regex::new(
        r"(?i)\b(?:name|dob|date\s+of\s+birth|year\s+of\s+birth|birth|born|gender|sex|address|pin\s*code|pincode|pin|vid)\b|नाम|जन्म|लिंग|पता"
    ).unwrap();

    // Government / issuer boilerplate printed on both faces
    pub static ref HEADER_TEXT: Regex = Regex::new(
        r"(?i)\b(?:government|india|aadhaar|aadhar|unique|identification|authority|uidai)\b|भारत\s*सरकार|आधार"
    ).unwrap();

    pub static ref ADDRESS_CONTINUATION: Regex = Regex::new(
        r"(?i)\b(?:\d{6}|[sdwc]/o|road|rd|street|st|lane|nagar|colony|house|flat|village|vill|dist|district|taluk|tehsil|po|near|sector|block|cross|layout|apartment|society)\b"
    ).unwrap();

    // Identity number shapes
    pub static ref ID_SPACED: Regex = Regex::new(
        r"\d{4}[ \t]+\d{4}[ \t]+\d{4}"
    ).unwrap();

    pub static ref ID_CONTIGUOUS: Regex = Regex::new(
        r"\d{12}"
    ).unwrap();

    pub static ref ID_GROUPED: Regex = Regex::new(
        r"\d{4}[- \t]\d{4}[- \t]\d{4}"
    ).unwrap();

    // Date of birth patterns
    pub static ref DOB_LABELED: Regex = Regex::new(
        r"(?i)(?:DOB|Date\s+of\s+Birth|जन्म\s*तिथि)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})"
    ).unwrap();

    pub static ref DOB_BIRTH: Regex = Regex::new(
        r"(?i)(?:Birth|Born)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})"
    ).unwrap();

    pub static ref DATE_BARE: Regex = Regex::new(
        r"(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})"
    ).unwrap();

    // Gender patterns
    pub static ref GENDER_LABELED: Regex = Regex::new(
        r"(?i)(?:Gender|Sex|लिंग)\s*:?\s*(Male|Female|M|F|पुरुष|महिला)\b"
    ).unwrap();

    pub static ref GENDER_BARE: Regex = Regex::new(
        r"(?i)\b(Male|Female|पुरुष|महिला)\b"
    ).unwrap();

    pub static ref GENDER_ONLY: Regex = Regex::new(
        r"(?i)^(?:Male|Female|पुरुष|महिला)$"
    ).unwrap();

    // Address patterns
    pub static ref ADDRESS_LABEL: Regex = Regex::new(
        r"(?i)\b(?:Address|पता)\s*:?"
    ).unwrap();

    pub static ref RELATION_PREFIX: Regex = Regex::new(
        r"(?i)\b(?:S/O|D/O|W/O|C/O)[\s:]+([^,\n]*(?:,\s*[^,\n]*)*)"
    ).unwrap();

    // Postal code patterns
    pub static ref PIN_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Pin\s*Code|Pincode|PIN)\s*:?\s*(\d{6})\b"
    ).unwrap();

    pub static ref PIN_BARE: Regex = Regex::new(
        r"\b(\d{6})\b"
    ).unwrap();

    pub static ref PIN_ONLY: Regex = Regex::new(
        r"^\d{6}$"
    ).unwrap();

    // Document identification
    pub static ref DOCUMENT_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(?:aadhaar|aadhar|government\s+of\s+india|unique\s+identification|uidai)\b|आधार|भारत\s*सरकार"
    ).unwrap();
}

/// True if the text contains any of the identity-number shapes.
///
/// Shape only: the digits are not counted or validated.
pub fn has_id_shape(text: &str) -> bool {
    ID_SPACED.is_match(text) || ID_CONTIGUOUS.is_match(text) || ID_GROUPED.is_match(text)
}
