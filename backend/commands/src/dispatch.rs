/// Command dispatch: route detected commands to handlers.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info, warn};
use voxrelay_core::ConversationId;
use voxrelay_logging::{BotEvent, EventLogger};

use crate::detection::detect_command;
use crate::registry::CommandRegistry;
use crate::replies;
use crate::types::{CommandInvocation, Detection};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub conversation_id: ConversationId,
    /// Sender's display handle, for logs only.
    pub sender: Option<String>,
    /// This bot's username; `/cmd@other_bot` is ignored when set.
    pub bot_username: Option<String>,
}

impl CommandContext {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self { conversation_id, sender: None, bot_username: None }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }
}

/// What a handler wants sent back to the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    Text(String),
    Audio { bytes: Bytes, filename: String },
}

impl CommandResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Audio { .. } => "audio",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Audio { .. } => None,
        }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry, handlers: HashMap::new() }
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run the handler for `inv`. Handler errors become the generic reply.
    pub async fn dispatch(&self, ctx: &CommandContext, inv: &CommandInvocation) -> CommandResponse {
        let Some(handler) = self.handlers.get(&inv.key) else {
            warn!("[Commands] No handler registered for /{}", inv.key);
            return CommandResponse::text(replies::GENERIC_ERROR);
        };

        info!(
            "[Commands] Dispatching /{} in conversation {} from {}",
            inv.key,
            ctx.conversation_id,
            ctx.sender.as_deref().unwrap_or("unknown sender")
        );
        match handler.handle(ctx, inv).await {
            Ok(response) => response,
            Err(e) => {
                error!(conversation = %ctx.conversation_id, command = %inv.key, "Command failed: {e:#}");
                CommandResponse::text(replies::GENERIC_ERROR)
            }
        }
    }

    /// Handle one inbound message. Plain text gets no reply.
    pub async fn handle_text(&self, ctx: &CommandContext, text: &str) -> Option<CommandResponse> {
        let conversation = ctx.conversation_id.to_string();
        let response = match detect_command(text, &self.registry, ctx.bot_username.as_deref()) {
            Detection::NotACommand => return None,
            Detection::Unknown(alias) => {
                info!(conversation = %conversation, alias = %alias, "Unknown command");
                CommandResponse::text(replies::unknown_command(&alias))
            }
            Detection::Command(inv) => {
                EventLogger::log_event(
                    &conversation,
                    BotEvent::CommandReceived { command: inv.key.clone(), text: text.to_string() },
                );
                self.dispatch(ctx, &inv).await
            }
        };

        EventLogger::log_event(
            &conversation,
            BotEvent::ReplySent { kind: response.kind().to_string() },
        );
        Some(response)
    }
}
