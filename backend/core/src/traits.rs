use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UpstreamError;
use crate::types::VoiceInfo;

/// A chat-completion backend.
///
/// The API key travels with every call; implementations keep no per-user state.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging (e.g. "openai").
    fn name(&self) -> &str;

    /// Send `prompt` as the user message and return the generated text.
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, UpstreamError>;
}

/// A text-to-speech backend with a voice catalog.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Synthesize `text` with `voice_id`, returning raw audio bytes.
    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: &str,
    ) -> Result<Bytes, UpstreamError>;

    /// Fetch the voices available to this key, in catalog order.
    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceInfo>, UpstreamError>;
}
