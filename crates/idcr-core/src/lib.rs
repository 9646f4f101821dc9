//! Core library for identity card OCR processing.
//!
//! This crate provides:
//! - Rule-based field extraction from front and back card text (name,
//!   identity number, date of birth, address, gender, postal code)
//! - OCR backends (pure Rust ONNX engine, optional Tesseract)
//! - Upload validation, record storage and the end-to-end card service

pub mod card;
pub mod error;
pub mod models;
pub mod ocr;
pub mod service;
pub mod store;
pub mod upload;

pub use card::{CardExtractor, CardParser, ExtractionResult, looks_like_expected_document};
pub use error::{ExtractionError, IdcrError, InputError, OcrError, Result, StoreError};
pub use models::{CardRecord, ExtractedRecord, Face, Field, IdcrConfig, NOT_FOUND};
pub use ocr::{OcrBackend, OcrResult, OcrWorker, ScopedWorker, TextBox, create_backend};
pub use service::CardService;
pub use store::{MemoryRecordStore, RecordStore, SqliteRecordStore, open_store};
pub use upload::{TempUpload, UploadedImage};

#[cfg(feature = "native")]
pub use ocr::OnnxBackend;
#[cfg(feature = "tesseract")]
pub use ocr::TesseractBackend;
