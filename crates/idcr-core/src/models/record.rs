//! Identity card record models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Marker written in place of any field that could not be located.
pub const NOT_FOUND: &str = "Not found";

/// One side of the scanned card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Front,
    Back,
}

impl Face {
    /// Multipart field name used for this face.
    pub fn as_str(&self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted field value.
///
/// Serializes as the plain string, or as [`NOT_FOUND`] when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    Found(String),
    #[default]
    NotFound,
}

impl Field {
    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }

    /// The value, if one was found.
    pub fn value(&self) -> Option<&str> {
        match self {
            Field::Found(value) => Some(value),
            Field::NotFound => None,
        }
    }

    /// The externally visible string (value or marker).
    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(NOT_FOUND)
    }

    /// Parse the externally visible string back into a field.
    pub fn from_marked(raw: String) -> Self {
        if raw == NOT_FOUND {
            Field::NotFound
        } else {
            Field::from(Some(raw))
        }
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Field::Found(v),
            _ => Field::NotFound,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Field::from_marked)
    }
}

/// Structured fields read from both faces of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    /// Card holder name.
    pub name: Field,

    /// 12-digit identity number, separators removed.
    pub id_number: Field,

    /// Date of birth exactly as printed (`DD/MM/YYYY` shaped).
    pub date_of_birth: Field,

    /// Free-text address.
    pub address: Field,

    /// `Male` or `Female`.
    pub gender: Field,

    /// 6-digit postal code.
    pub postal_code: Field,
}

impl ExtractedRecord {
    /// Field names paired with their values, in output order.
    pub fn fields(&self) -> [(&'static str, &Field); 6] {
        [
            ("name", &self.name),
            ("idNumber", &self.id_number),
            ("dateOfBirth", &self.date_of_birth),
            ("address", &self.address),
            ("gender", &self.gender),
            ("postalCode", &self.postal_code),
        ]
    }

    /// Names of the fields that could not be located.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, field)| !field.is_found())
            .map(|(name, _)| name)
            .collect()
    }
}

/// A processed card as persisted and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: Uuid,

    #[serde(flatten)]
    pub fields: ExtractedRecord,

    pub created_at: DateTime<Utc>,
}

impl CardRecord {
    /// Wrap freshly extracted fields with a new id and timestamp.
    pub fn new(fields: ExtractedRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
            created_at: Utc::now(),
        }
    }
}
