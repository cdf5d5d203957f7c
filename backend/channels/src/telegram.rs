use std::sync::Arc;

use crate::ChannelAdapter;
use crate::telegram_commands::publish_command_menu;
use crate::telegram_media::send_response;
use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};
use voxrelay_commands::{CommandContext, CommandDispatcher};
use voxrelay_core::ConversationId;
use voxrelay_logging::redact_sensitive_data;

pub struct TelegramAdapter {
    bot: Bot,
    dispatcher: Arc<CommandDispatcher>,
    publish_commands: bool,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            bot: Bot::new(token),
            dispatcher,
            publish_commands: true,
        }
    }

    /// Whether to register the command menu with Telegram on start.
    pub fn with_command_menu(mut self, publish: bool) -> Self {
        self.publish_commands = publish;
        self
    }
}

/// This bot's username, so `/cmd@other_bot` in groups is left alone.
#[derive(Clone, Default)]
struct OwnUsername(Option<String>);

async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<CommandDispatcher>,
    own: OwnUsername,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return respond(());
    };
    let chat_id = msg.chat.id;
    debug!("Received message from Telegram chat {}: {}", chat_id, redact_sensitive_data(text));

    let mut ctx = CommandContext::new(ConversationId(chat_id.0));
    if let Some(username) = msg.chat.username() {
        ctx = ctx.with_sender(username);
    }
    if let OwnUsername(Some(own)) = own {
        ctx = ctx.with_bot_username(own);
    }

    if let Some(response) = dispatcher.handle_text(&ctx, text).await {
        // A failed send only loses this reply.
        if let Err(e) = send_response(&bot, chat_id, response).await {
            error!("Failed to reply to Telegram chat {}: {:#}", chat_id, e);
        }
    }
    respond(())
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str { "telegram" }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");

        if self.publish_commands {
            publish_command_menu(&self.bot, self.dispatcher.registry()).await;
        }

        let own = match self.bot.get_me().await {
            Ok(me) => OwnUsername(me.user.username.clone()),
            Err(e) => {
                warn!("Could not fetch bot identity; accepting commands addressed to any bot: {}", e);
                OwnUsername::default()
            }
        };
        info!("Telegram bot username: {}", own.0.as_deref().unwrap_or("unknown"));

        let handler = Update::filter_message().endpoint(handle_message);

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.dispatcher.clone(), own])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}
