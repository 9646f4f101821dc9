//! OCR backends.
//!
//! A backend is long-lived and shared; a worker is started per request,
//! recognizes the front face then the back face, and is torn down when it is
//! dropped.

#[cfg(feature = "native")]
mod pure_engine;
#[cfg(feature = "tesseract")]
mod tesseract;

#[cfg(feature = "native")]
pub use pure_engine::OnnxBackend;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractBackend;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{OcrBackendKind, OcrConfig};

/// A recognized text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR on one card face.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes. Empty for engines that only report page text.
    pub boxes: Vec<TextBox>,

    /// Full text, one line per row of boxes.
    pub text: String,

    /// Page-level confidence reported by the engine, if any (0.0 - 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Wrap plain text, as read from a file or produced by a page-level engine.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Mean confidence over all boxes, falling back to the page confidence.
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.boxes.is_empty() {
            return self.confidence;
        }

        let sum: f32 = self.boxes.iter().map(|b| b.confidence).sum();
        Some(sum / self.boxes.len() as f32)
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right) and rebuild
    /// the text, one line per row.
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let mut lines: Vec<String> = Vec::new();
        let mut current_row: Option<i32> = None;

        for text_box in &self.boxes {
            let (_, y, _, _) = text_box.rect();
            let row = (y / 20.0) as i32;

            if current_row == Some(row) {
                if let Some(line) = lines.last_mut() {
                    line.push(' ');
                    line.push_str(&text_box.text);
                }
            } else {
                lines.push(text_box.text.clone());
                current_row = Some(row);
            }
        }

        self.text = lines.join("\n");
    }
}

/// A started OCR engine instance. Recognizes one image at a time.
///
/// Implementations release their engine resources in `Drop`.
pub trait OcrWorker {
    /// Recognize the text in the image at `path`.
    fn recognize(&mut self, path: &Path) -> Result<OcrResult, OcrError>;
}

/// Factory for OCR workers, shared across requests.
pub trait OcrBackend: Send + Sync {
    /// Backend identifier used in logs.
    fn name(&self) -> &'static str;

    /// Start a worker configured for card recognition.
    fn start(&self) -> Result<Box<dyn OcrWorker>, OcrError>;
}

/// A worker that logs its own teardown.
///
/// Dropping the guard drops the worker, on success, on error and while
/// unwinding.
pub struct ScopedWorker {
    worker: Box<dyn OcrWorker>,
    backend: &'static str,
}

impl ScopedWorker {
    /// Start a worker from `backend`.
    pub fn start(backend: &dyn OcrBackend) -> Result<Self, OcrError> {
        let worker = backend.start()?;
        debug!("Started {} OCR worker", backend.name());

        Ok(Self {
            worker,
            backend: backend.name(),
        })
    }

    pub fn recognize(&mut self, path: &Path) -> Result<OcrResult, OcrError> {
        self.worker.recognize(path)
    }
}

impl Drop for ScopedWorker {
    fn drop(&mut self) {
        info!("{} OCR worker terminated", self.backend);
    }
}

/// Drop characters outside `whitelist`. Line breaks are always kept; an empty
/// whitelist keeps everything.
pub fn apply_char_whitelist(text: &str, whitelist: &str) -> String {
    if whitelist.is_empty() {
        return text.to_string();
    }

    text.chars()
        .filter(|c| *c == '\n' || whitelist.contains(*c))
        .collect()
}

/// Create the backend selected in `config`.
pub fn create_backend(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>, OcrError> {
    match config.backend {
        #[cfg(feature = "native")]
        OcrBackendKind::Onnx => Ok(Arc::new(OnnxBackend::from_config(config.clone())?)),
        #[cfg(feature = "tesseract")]
        OcrBackendKind::Tesseract => Ok(Arc::new(TesseractBackend::new(config.clone())?)),
        #[allow(unreachable_patterns)]
        other => Err(OcrError::EngineStart(format!(
            "OCR backend {:?} is not enabled in this build",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_reading_order_joins_rows() {
        let mut result = OcrResult {
            boxes: vec![
                text_box("Kumar", 120.0, 12.0),
                text_box("1234 5678 9123", 10.0, 60.0),
                text_box("Rajeev", 10.0, 10.0),
            ],
            ..Default::default()
        };

        result.sort_by_reading_order();

        assert_eq!(result.text, "Rajeev Kumar\n1234 5678 9123");
    }

    #[test]
    fn test_mean_confidence() {
        let mut result = OcrResult::from_text("x");
        assert_eq!(result.mean_confidence(), None);

        result.confidence = Some(0.8);
        assert_eq!(result.mean_confidence(), Some(0.8));

        result.boxes = vec![text_box("a", 0.0, 0.0), text_box("b", 60.0, 0.0)];
        result.boxes[1].confidence = 0.5;
        assert!((result.mean_confidence().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_char_whitelist() {
        let whitelist = crate::models::config::DEFAULT_CHAR_WHITELIST;
        assert_eq!(
            apply_char_whitelist("Name: Rajeev|Kumar\n12, MG Road;", whitelist),
            "Name: RajeevKumar\n12, MG Road"
        );
        assert_eq!(apply_char_whitelist("a|b", ""), "a|b");
    }
}
