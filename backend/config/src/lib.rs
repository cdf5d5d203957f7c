//! `voxrelay-config`: runtime configuration.
//!
//! Provides:
//! - Typed config schema (Telegram, security, OpenAI, ElevenLabs, logging)
//! - YAML loading
//! - Environment overrides
//! - Default value application
//! - Validation with errors and warnings
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::apply_env_overrides;
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use redact::redact;
pub use schema::{
    BotConfig, ElevenLabsConfig, LoggingConfig, OpenAiConfig, SecurityConfig, TelegramConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, overlay `env`, apply defaults and validate.
///
/// Problems are returned in the report; the caller decides whether errors are
/// fatal and logs them once its subscriber is installed.
pub async fn load_and_prepare(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(BotConfig, ValidationReport)> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    Ok((config, report))
}
