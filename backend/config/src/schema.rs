//! voxrelay configuration schema.
//!
//! Every section is optional in the YAML file; missing sections and fields
//! take the values from `defaults`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub security: SecurityConfig,
    pub openai: OpenAiConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Telegram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather. Required to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Register the command list with Telegram on startup.
    pub publish_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            publish_commands: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityConfig {
    /// Base64 process key (32 bytes). Generated per run when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Upstreams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    /// Per-request timeout. Unset means wait for the transport's own limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_OPENAI_BASE_URL.to_string(),
            model: defaults::DEFAULT_OPENAI_MODEL.to_string(),
            system_prompt: defaults::DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElevenLabsConfig {
    pub base_url: String,
    pub model_id: String,
    /// Voice for conversations that never ran /set_voice.
    pub default_voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            model_id: defaults::DEFAULT_ELEVENLABS_MODEL_ID.to_string(),
            default_voice_id: defaults::DEFAULT_VOICE_ID.to_string(),
            stability: defaults::DEFAULT_STABILITY,
            similarity_boost: defaults::DEFAULT_SIMILARITY_BOOST,
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling JSON logs; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}
