/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler`. Handlers
/// that talk to upstream services share one `BotServices` bundle.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use voxrelay_core::{CompletionProvider, ConversationId, Service, SpeechProvider, UpstreamError};
use voxrelay_logging::{BotEvent, EventLogger, redact_sensitive_data};
use voxrelay_security::{CredentialStore, StoreError};

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::filename::{audio_filename, filename_prompt};
use crate::registry::CommandRegistry;
use crate::replies;
use crate::types::CommandInvocation;

/// Store and upstream clients injected into the handlers.
#[derive(Clone)]
pub struct BotServices {
    pub store: Arc<CredentialStore>,
    pub completion: Arc<dyn CompletionProvider>,
    pub speech: Arc<dyn SpeechProvider>,
    /// Used by `/query` until the conversation selects a voice.
    pub default_voice_id: String,
}

/// Decrypt a key the command cannot run without, or produce the reply explaining why not.
async fn required_key(
    store: &CredentialStore,
    id: ConversationId,
    service: Service,
) -> std::result::Result<String, CommandResponse> {
    match store.decrypted_key(id, service).await {
        Ok(Some(key)) => Ok(key),
        Ok(None) => Err(CommandResponse::text(replies::key_not_configured(service))),
        Err(e) => {
            warn!(conversation = %id, service = %service, "Stored API key unusable: {e}");
            Err(CommandResponse::text(replies::key_unreadable(service)))
        }
    }
}

/// Upstream error text safe for logs; rejected bodies can echo keys back.
fn failure_detail(err: &UpstreamError) -> String {
    redact_sensitive_data(&err.to_string())
}

fn log_upstream_failure(ctx: &CommandContext, stage: &str, err: &UpstreamError) {
    let detail = failure_detail(err);
    warn!(conversation = %ctx.conversation_id, stage, "Upstream call failed: {detail}");
    EventLogger::log_event(
        &ctx.conversation_id.to_string(),
        BotEvent::UpstreamFailure {
            service: err.service().to_string(),
            error_msg: detail,
        },
    );
}

fn upstream_failure(ctx: &CommandContext, stage: &str, err: &UpstreamError) -> CommandResponse {
    log_upstream_failure(ctx, stage, err);
    CommandResponse::text(replies::GENERIC_ERROR)
}

// ---------------------------------------------------------------------------
// /start
// ---------------------------------------------------------------------------

pub struct StartHandler;

#[async_trait]
impl CommandHandler for StartHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        Ok(CommandResponse::text(replies::WELCOME))
    }
}

// ---------------------------------------------------------------------------
// /help, /commands
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub registry: CommandRegistry,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        Ok(CommandResponse::text(replies::help(&self.registry)))
    }
}

// ---------------------------------------------------------------------------
// /openai, /elevenlabs
// ---------------------------------------------------------------------------

pub struct SetKeyHandler {
    pub store: Arc<CredentialStore>,
    pub service: Service,
}

#[async_trait]
impl CommandHandler for SetKeyHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let key = inv.raw_args.trim();
        if key.is_empty() {
            return Ok(CommandResponse::text(replies::key_usage(self.service)));
        }

        match self.store.set_key(ctx.conversation_id, self.service, key).await {
            Ok(()) => Ok(CommandResponse::text(replies::key_configured(self.service))),
            Err(e) => {
                error!(conversation = %ctx.conversation_id, service = %self.service, "Could not store API key: {e}");
                Ok(CommandResponse::text(replies::KEY_STORE_UNAVAILABLE))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// /query
// ---------------------------------------------------------------------------

/// Completion, then speech, then a second completion to name the file.
pub struct QueryHandler {
    pub services: BotServices,
}

#[async_trait]
impl CommandHandler for QueryHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let id = ctx.conversation_id;
        let store = &self.services.store;

        if !store.has_record(id).await {
            return Ok(CommandResponse::text(replies::KEYS_NOT_CONFIGURED));
        }
        let openai_key = match required_key(store, id, Service::OpenAi).await {
            Ok(key) => key,
            Err(reply) => return Ok(reply),
        };
        let elevenlabs_key = match required_key(store, id, Service::ElevenLabs).await {
            Ok(key) => key,
            Err(reply) => return Ok(reply),
        };
        let prompt = inv.raw_args.trim();
        if prompt.is_empty() {
            return Ok(CommandResponse::text(replies::QUERY_USAGE));
        }

        let voice_id = store
            .voice_id(id)
            .await
            .unwrap_or_else(|| self.services.default_voice_id.clone());
        info!(
            conversation = %id,
            voice_id = %voice_id,
            completion = self.services.completion.name(),
            speech = self.services.speech.name(),
            "Processing query"
        );

        let answer = match self.services.completion.complete(&openai_key, prompt).await {
            Ok(answer) => answer,
            Err(e) => return Ok(upstream_failure(ctx, "completion", &e)),
        };

        let audio = match self
            .services
            .speech
            .synthesize(&elevenlabs_key, &answer, &voice_id)
            .await
        {
            Ok(audio) => audio,
            Err(e) => return Ok(upstream_failure(ctx, "synthesis", &e)),
        };

        let suggested = match self
            .services
            .completion
            .complete(&openai_key, &filename_prompt(&answer))
            .await
        {
            Ok(name) => name,
            Err(e) => return Ok(upstream_failure(ctx, "filename", &e)),
        };

        Ok(CommandResponse::Audio {
            bytes: audio,
            filename: audio_filename(&suggested),
        })
    }
}

// ---------------------------------------------------------------------------
// /voices
// ---------------------------------------------------------------------------

pub struct VoicesHandler {
    pub services: BotServices,
}

#[async_trait]
impl CommandHandler for VoicesHandler {
    async fn handle(&self, ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        let id = ctx.conversation_id;
        let key = match required_key(&self.services.store, id, Service::ElevenLabs).await {
            Ok(key) => key,
            Err(reply) => return Ok(reply),
        };

        debug!(conversation = %id, speech = self.services.speech.name(), "Fetching voice catalog");
        let voices = match self.services.speech.list_voices(&key).await {
            Ok(voices) => voices,
            Err(e) => {
                log_upstream_failure(ctx, "voices", &e);
                return Ok(CommandResponse::text(replies::VOICES_ERROR));
            }
        };
        if voices.is_empty() {
            return Ok(CommandResponse::text(replies::NO_VOICES));
        }

        let reply = replies::voice_list(&voices);
        self.services.store.cache_voices(id, voices).await;
        Ok(CommandResponse::text(reply))
    }
}

// ---------------------------------------------------------------------------
// /set_voice
// ---------------------------------------------------------------------------

pub struct SetVoiceHandler {
    pub store: Arc<CredentialStore>,
}

/// Voice ids are opaque catalog keys made of ASCII letters and digits.
fn is_valid_voice_id(voice_id: &str) -> bool {
    !voice_id.is_empty() && voice_id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// The id after a leading `-id` flag, if the flag is present.
fn id_flag(args: &str) -> Option<&str> {
    args.strip_prefix("-id")
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        .map(str::trim)
}

#[async_trait]
impl CommandHandler for SetVoiceHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let args = inv.raw_args.trim();
        if args.is_empty() {
            return Ok(CommandResponse::text(replies::SET_VOICE_USAGE));
        }

        if let Some(voice_id) = id_flag(args) {
            if voice_id.is_empty() {
                return Ok(CommandResponse::text(replies::SET_VOICE_USAGE));
            }
            if !is_valid_voice_id(voice_id) {
                info!(conversation = %ctx.conversation_id, "Rejected malformed voice id");
                return Ok(CommandResponse::text(replies::INVALID_VOICE_ID));
            }
            self.store.set_voice(ctx.conversation_id, voice_id).await;
            return Ok(CommandResponse::text(replies::voice_id_set(voice_id)));
        }

        match self.store.select_voice(ctx.conversation_id, args).await {
            Ok(voice) => Ok(CommandResponse::text(replies::voice_selected(&voice))),
            Err(StoreError::CatalogMissing) => Ok(CommandResponse::text(replies::CATALOG_MISSING)),
            Err(StoreError::NoMatch(input)) => {
                info!(conversation = %ctx.conversation_id, input = %input, "No voice matched");
                Ok(CommandResponse::text(replies::INVALID_VOICE))
            }
            Err(e) => Err(e.into()),
        }
    }
}
