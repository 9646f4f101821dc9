//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::IdcrConfig;
pub use record::{CardRecord, ExtractedRecord, Face, Field, NOT_FOUND};
