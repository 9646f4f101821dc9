//! HTTP service for identity card OCR.
//!
//! Routes:
//! - `POST /api/ocr/process`: multipart `front` and `back` images, returns the stored record
//! - `GET /health`: liveness check

mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use idcr_core::CardService;
use idcr_core::models::config::{IdcrConfig, UploadConfig};

pub use error::{ApiError, ErrorBody};
pub use handlers::{HealthResponse, health_check, process_card};

/// Room for multipart boundaries and headers on top of two images.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CardService>,
    pub upload: UploadConfig,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(service: CardService, config: &IdcrConfig) -> Self {
        Self {
            service: Arc::new(service),
            upload: config.upload.clone(),
            expose_error_details: config.server.expose_error_details,
        }
    }
}

/// Build the router with CORS restricted to `cors_origins`.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = (state.upload.max_file_size as usize)
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/ocr/process", post(process_card))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until the process exits.
pub async fn start_server(addr: &str, app: Router) -> Result<(), std::io::Error> {
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
