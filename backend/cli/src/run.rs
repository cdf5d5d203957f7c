use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use voxrelay_channels::{ChannelAdapter, TelegramAdapter};
use voxrelay_commands::{build_dispatcher, BotServices};
use voxrelay_completion::OpenAiCompletion;
use voxrelay_config::BotConfig;
use voxrelay_security::{CredentialCipher, CredentialStore};
use voxrelay_tts::{ElevenLabsTts, VoiceSettings};

/// Wire the store, upstream clients and dispatcher, then serve Telegram until Ctrl-C.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    info!(
        config = %voxrelay_config::redact(&config),
        "Starting voxrelay"
    );

    let token = config
        .telegram
        .token
        .clone()
        .context("TELEGRAM_TOKEN is not set")?;

    let (cipher, origin) = CredentialCipher::from_config(config.security.encryption_key.as_deref())
        .context("ENCRYPTION_KEY is not a valid key; generate one with `voxrelay gen-key`")?;
    info!(?origin, "Credential cipher ready");
    let store = Arc::new(CredentialStore::new(Arc::new(cipher)));

    let completion = OpenAiCompletion::new()
        .with_base_url(&config.openai.base_url)
        .with_model(&config.openai.model)
        .with_system_prompt(&config.openai.system_prompt)
        .with_timeout(config.openai.timeout_secs.map(Duration::from_secs));

    let speech = ElevenLabsTts::new()
        .with_base_url(&config.elevenlabs.base_url)
        .with_model(&config.elevenlabs.model_id)
        .with_settings(VoiceSettings {
            stability: config.elevenlabs.stability,
            similarity_boost: config.elevenlabs.similarity_boost,
        })
        .with_timeout(config.elevenlabs.timeout_secs.map(Duration::from_secs));

    let dispatcher = build_dispatcher(BotServices {
        store,
        completion: Arc::new(completion),
        speech: Arc::new(speech),
        default_voice_id: config.elevenlabs.default_voice_id.clone(),
    });

    let adapter = TelegramAdapter::new(token, Arc::new(dispatcher))
        .with_command_menu(config.telegram.publish_commands);
    info!(adapter = adapter.name(), "Channel adapter registered");
    adapter.start().await
}
