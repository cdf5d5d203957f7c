//! Config defaults and normalisation of loaded values.

use crate::schema::BotConfig;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a chatbot";

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_ELEVENLABS_MODEL_ID: &str = "eleven_monolingual_v1";
pub use voxrelay_core::DEFAULT_VOICE_ID;
pub const DEFAULT_STABILITY: f32 = 0.75;
pub const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Replace blank values with defaults and tidy URLs and secrets.
pub fn apply_all_defaults(config: BotConfig) -> BotConfig {
    let config = apply_secret_defaults(config);
    let config = apply_openai_defaults(config);
    let config = apply_elevenlabs_defaults(config);
    apply_logging_defaults(config)
}

fn or_default(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Blank secrets count as unset.
fn apply_secret_defaults(mut config: BotConfig) -> BotConfig {
    config.telegram.token = non_blank(config.telegram.token.take());
    config.security.encryption_key = non_blank(config.security.encryption_key.take());
    config
}

fn apply_openai_defaults(mut config: BotConfig) -> BotConfig {
    let openai = &mut config.openai;
    or_default(&mut openai.base_url, DEFAULT_OPENAI_BASE_URL);
    or_default(&mut openai.model, DEFAULT_OPENAI_MODEL);
    or_default(&mut openai.system_prompt, DEFAULT_SYSTEM_PROMPT);
    openai.base_url = openai.base_url.trim_end_matches('/').to_string();
    config
}

fn apply_elevenlabs_defaults(mut config: BotConfig) -> BotConfig {
    let el = &mut config.elevenlabs;
    or_default(&mut el.base_url, DEFAULT_ELEVENLABS_BASE_URL);
    or_default(&mut el.model_id, DEFAULT_ELEVENLABS_MODEL_ID);
    or_default(&mut el.default_voice_id, DEFAULT_VOICE_ID);
    el.base_url = el.base_url.trim_end_matches('/').to_string();
    config
}

fn apply_logging_defaults(mut config: BotConfig) -> BotConfig {
    or_default(&mut config.logging.level, DEFAULT_LOG_LEVEL);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fall_back() {
        let mut cfg = BotConfig::default();
        cfg.openai.model = "  ".into();
        cfg.elevenlabs.default_voice_id = String::new();
        cfg.logging.level = String::new();
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.openai.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(cfg.elevenlabs.default_voice_id, DEFAULT_VOICE_ID);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let mut cfg = BotConfig::default();
        cfg.openai.base_url = "http://localhost:8080/v1/".into();
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.openai.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn blank_secrets_become_none() {
        let mut cfg = BotConfig::default();
        cfg.telegram.token = Some(" ".into());
        cfg.security.encryption_key = Some(String::new());
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.telegram.token, None);
        assert_eq!(cfg.security.encryption_key, None);
    }
}
