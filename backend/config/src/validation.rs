//! Config validation: checks with user-friendly error messages.

use crate::schema::BotConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding through `tracing`.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_telegram(config, &mut report);
    validate_security(config, &mut report);
    validate_upstreams(config, &mut report);
    report
}

fn validate_telegram(config: &BotConfig, report: &mut ValidationReport) {
    match &config.telegram.token {
        None => report.error(
            "telegram.token",
            "Telegram bot token is not set; export TELEGRAM_TOKEN",
        ),
        Some(token) if !token.contains(':') => report.error(
            "telegram.token",
            "Telegram bot token should look like '<bot id>:<secret>'",
        ),
        Some(_) => {}
    }
}

fn validate_security(config: &BotConfig, report: &mut ValidationReport) {
    if config.security.encryption_key.is_none() {
        report.warn(
            "security.encryptionKey",
            "No encryption key set; a new key is generated on every start",
        );
    }
}

fn validate_url(report: &mut ValidationReport, path: &str, url: &str) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error(path, format!("'{url}' is not an http(s) URL"));
    }
}

fn validate_unit_interval(report: &mut ValidationReport, path: &str, value: f32) {
    if !(0.0..=1.0).contains(&value) {
        report.error(path, format!("{value} must be between 0 and 1"));
    }
}

fn validate_timeout(report: &mut ValidationReport, path: &str, timeout: Option<u64>) {
    if timeout == Some(0) {
        report.warn(path, "A zero timeout makes every request fail immediately");
    }
}

fn validate_upstreams(config: &BotConfig, report: &mut ValidationReport) {
    validate_url(report, "openai.baseUrl", &config.openai.base_url);
    validate_timeout(report, "openai.timeoutSecs", config.openai.timeout_secs);

    let el = &config.elevenlabs;
    validate_url(report, "elevenlabs.baseUrl", &el.base_url);
    validate_unit_interval(report, "elevenlabs.stability", el.stability);
    validate_unit_interval(report, "elevenlabs.similarityBoost", el.similarity_boost);
    validate_timeout(report, "elevenlabs.timeoutSecs", el.timeout_secs);
}
