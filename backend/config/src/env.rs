//! Environment overrides for config values.
//!
//! Environment variables win over the file. Empty values are ignored so an
//! exported-but-blank variable never wipes a configured setting.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::schema::BotConfig;

pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENCRYPTION_KEY: &str = "ENCRYPTION_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ELEVENLABS_BASE_URL: &str = "ELEVENLABS_BASE_URL";
pub const ELEVENLABS_MODEL_ID: &str = "ELEVENLABS_MODEL_ID";
pub const LOG_LEVEL: &str = "VOXRELAY_LOG_LEVEL";
pub const LOG_DIR: &str = "VOXRELAY_LOG_DIR";

/// Apply overrides from an environment map.
pub fn apply_env_overrides(mut config: BotConfig, env: &HashMap<String, String>) -> BotConfig {
    let get = |name: &str| {
        env.get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| {
                debug!(var = name, "Config value taken from environment");
                v.to_string()
            })
    };

    if let Some(token) = get(TELEGRAM_TOKEN) {
        config.telegram.token = Some(token);
    }
    if let Some(key) = get(ENCRYPTION_KEY) {
        config.security.encryption_key = Some(key);
    }
    if let Some(url) = get(OPENAI_BASE_URL) {
        config.openai.base_url = url;
    }
    if let Some(model) = get(OPENAI_MODEL) {
        config.openai.model = model;
    }
    if let Some(url) = get(ELEVENLABS_BASE_URL) {
        config.elevenlabs.base_url = url;
    }
    if let Some(model) = get(ELEVENLABS_MODEL_ID) {
        config.elevenlabs.model_id = model;
    }
    if let Some(level) = get(LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(dir) = get(LOG_DIR) {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    config
}
