pub mod batch;
pub mod config;
pub mod extract;
pub mod process;

use std::path::{Path, PathBuf};

use idcr_core::models::config::IdcrConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idcr")
        .join("config.json")
}

/// Load the explicit config file, else the default file if present, else
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IdcrConfig> {
    if let Some(path) = config_path {
        return Ok(IdcrConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(IdcrConfig::from_file(&default_path)?)
    } else {
        Ok(IdcrConfig::default())
    }
}
