//! Request handlers.

use axum::Json;
use axum::extract::{Multipart, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use idcr_core::upload::require_both;
use idcr_core::{CardRecord, Face, TempUpload};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Backend server is running",
        timestamp: Utc::now(),
    })
}

/// `POST /api/ocr/process` with multipart parts `front` and `back`.
///
/// Each part is written to a temporary file in the upload directory. The
/// files are removed when the blocking task finishes, on every outcome.
pub async fn process_card(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CardRecord>, ApiError> {
    info!("Processing images request received");

    let mut front = None;
    let mut back = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        let face = match field.name() {
            Some("front") => Face::Front,
            Some("back") => Face::Back,
            other => {
                debug!("Ignoring multipart field {:?}", other);
                continue;
            }
        };

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(ApiError::from_multipart)?;

        if bytes.len() as u64 > state.upload.max_file_size {
            return Err(ApiError::TooLarge(format!(
                "{} image is {} bytes, limit is {}",
                face,
                bytes.len(),
                state.upload.max_file_size
            )));
        }

        let upload = TempUpload::write(&state.upload.upload_dir, face, &mime_type, &bytes)
            .map_err(|e| ApiError::processing(e, state.expose_error_details))?;

        match face {
            Face::Front => front = Some(upload),
            Face::Back => back = Some(upload),
        }
    }

    let (front, back) = require_both(front, back).map_err(|_| ApiError::MissingImages)?;

    let service = state.service.clone();
    let expose = state.expose_error_details;

    let record = tokio::task::spawn_blocking(move || service.process(front.image(), back.image()))
        .await
        .map_err(|e| ApiError::processing(e, expose))?
        .map_err(|e| ApiError::from_pipeline(e, expose))?;

    info!("OCR processing completed for record {}", record.id);

    Ok(Json(record))
}
