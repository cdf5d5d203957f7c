//! Config file loading.

use crate::schema::BotConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the voxrelay config directory.
/// Priority: `VOXRELAY_CONFIG_DIR` env > `~/.voxrelay/` > `./.voxrelay`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VOXRELAY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".voxrelay"),
        None => PathBuf::from(".voxrelay"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse config YAML. An empty document yields defaults.
pub fn parse_config(raw: &str) -> Result<BotConfig> {
    if raw.trim().is_empty() {
        return Ok(BotConfig::default());
    }
    serde_yaml::from_str(raw).context("Failed to parse config YAML")
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist, so the bot can
/// run from environment variables alone.
pub async fn load_config(path: &Path) -> Result<BotConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(BotConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
