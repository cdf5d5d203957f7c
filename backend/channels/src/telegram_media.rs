//! Telegram reply delivery: text messages and in-memory audio uploads.

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::info;
use voxrelay_commands::CommandResponse;

/// Send one command response to `chat_id`.
pub async fn send_response(bot: &Bot, chat_id: ChatId, response: CommandResponse) -> Result<()> {
    match response {
        CommandResponse::Text(text) => {
            bot.send_message(chat_id, text)
                .await
                .context("sending text reply")?;
        }
        CommandResponse::Audio { bytes, filename } => {
            info!("Uploading audio {} ({} bytes) to chat_id: {}", filename, bytes.len(), chat_id);
            let file = InputFile::memory(bytes.to_vec()).file_name(filename);
            bot.send_audio(chat_id, file)
                .await
                .context("sending audio reply")?;
        }
    }
    Ok(())
}
