use async_trait::async_trait;

pub mod telegram;
pub mod telegram_commands;
pub mod telegram_media;

pub use telegram::TelegramAdapter;

/// Chat transports implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's receive loop until shutdown.
    async fn start(&self) -> anyhow::Result<()>;
}
