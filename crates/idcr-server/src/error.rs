//! HTTP error responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use idcr_core::{ExtractionError, Face, IdcrError, InputError};

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Request failures mapped to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please upload both front and back images.")]
    MissingImages,
    #[error("Only JPEG or PNG images are allowed.")]
    UnsupportedType,
    #[error("{0}")]
    TooLarge(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("The {0} image does not look like an identity card.")]
    DocumentMismatch(Face),
    #[error("Failed to process images.")]
    Processing {
        cause: String,
        details: Option<String>,
    },
}

impl ApiError {
    /// Engine or server failure. `cause` is returned to the client only when
    /// `expose_details` is set.
    pub fn processing(cause: impl ToString, expose_details: bool) -> Self {
        let cause = cause.to_string();
        let details = expose_details.then(|| cause.clone());
        ApiError::Processing { cause, details }
    }

    /// Map a pipeline error onto its response.
    pub fn from_pipeline(err: IdcrError, expose_details: bool) -> Self {
        match err {
            IdcrError::Input(InputError::MissingFace(_)) => ApiError::MissingImages,
            IdcrError::Input(InputError::UnsupportedMimeType { .. }) => ApiError::UnsupportedType,
            IdcrError::Input(e @ InputError::FileTooLarge { .. }) => ApiError::TooLarge(e.to_string()),
            IdcrError::Extraction(ExtractionError::DocumentMismatch { face }) => {
                ApiError::DocumentMismatch(face)
            }
            other => ApiError::processing(other, expose_details),
        }
    }

    /// Map a multipart read failure, keeping axum's 413 for oversize bodies.
    pub fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImages | ApiError::UnsupportedType | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::DocumentMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            ApiError::Processing { cause, details } => {
                tracing::error!(cause, "Card processing failed");
                details.clone()
            }
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        (self.status(), Json(body)).into_response()
    }
}
