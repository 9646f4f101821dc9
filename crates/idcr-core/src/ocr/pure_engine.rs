//! Pure Rust OCR backend using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use image::GenericImageView;
use pure_onnx_ocr::engine::{OcrEngine, OcrEngineBuilder};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrBackend, OcrResult, OcrWorker, TextBox, apply_char_whitelist};

/// OCR backend backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Models are loaded once; every worker shares the loaded engine.
pub struct OnnxBackend {
    engine: Arc<Mutex<OcrEngine>>,
    config: OcrConfig,
}

impl OnnxBackend {
    /// Load the detection model, recognition model and dictionary named in
    /// `config` from its model directory.
    pub fn from_config(config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            config,
        })
    }
}

impl OcrBackend for OnnxBackend {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn start(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        Ok(Box::new(OnnxWorker {
            engine: Arc::clone(&self.engine),
            config: self.config.clone(),
        }))
    }
}

struct OnnxWorker {
    engine: Arc<Mutex<OcrEngine>>,
    config: OcrConfig,
}

impl OcrWorker for OnnxWorker {
    fn recognize(&mut self, path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let image = image::open(path)
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?;
        let (width, height) = image.dimensions();

        debug!("Recognizing {} ({}x{})", path.display(), width, height);

        let results = {
            let engine = self
                .engine
                .lock()
                .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;
            engine
                .run_from_image(&image)
                .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?
        };

        let boxes: Vec<TextBox> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };

                TextBox {
                    bbox: polygon_to_bbox(&r.bounding_box),
                    text: apply_char_whitelist(&text, &self.config.char_whitelist),
                    confidence: r.confidence,
                }
            })
            .filter(|b| !b.text.trim().is_empty())
            .collect();

        let mut result = OcrResult {
            boxes,
            image_size: (width, height),
            ..Default::default()
        };
        result.sort_by_reading_order();
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "OCR complete: {} text boxes in {}ms",
            result.boxes.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
///
/// Extracts the first 4 exterior points (quadrilateral) as
/// `[x1, y1, x2, y2, x3, y3, x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = OcrConfig {
            model_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = OnnxBackend::from_config(config).err().unwrap();
        assert!(matches!(err, OcrError::ModelLoad(_)));
        assert!(err.to_string().contains("det.onnx"));
    }
}
