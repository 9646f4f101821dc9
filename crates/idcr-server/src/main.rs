//! HTTP server entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use idcr_core::models::config::IdcrConfig;
use idcr_core::{CardParser, CardService, create_backend, open_store};
use idcr_server::{AppState, build_router, start_server};

/// Identity card OCR HTTP server
#[derive(Parser)]
#[command(name = "idcr-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => IdcrConfig::from_file(path)?,
        None => IdcrConfig::default(),
    };
    config.apply_env_overrides();

    if config.server.expose_error_details {
        warn!("Development mode: error details are included in responses");
    }

    let store = open_store(&config.storage);
    info!("Using {} record store", store.name());

    let backend = create_backend(&config.ocr)?;
    info!("Using {} OCR backend", backend.name());

    let parser = CardParser::new().with_document_check(config.extraction.require_document_match);
    let service =
        CardService::new(backend, parser, store).with_upload_limits(config.upload.clone());

    let app = build_router(AppState::new(service, &config), &config.server.cors_origins);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    start_server(&addr, app).await?;

    Ok(())
}
