use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use voxrelay_config::{config_dir, config_file_path, load_and_prepare, BotConfig, ValidationReport};

/// Explicit path, or `config.yaml` in the config directory.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Load the config file and overlay the process environment.
pub async fn load(explicit: Option<&Path>) -> Result<(BotConfig, ValidationReport)> {
    let path = resolve_path(explicit);
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare(&path, &env)
        .await
        .with_context(|| format!("loading configuration from {}", path.display()))
}
