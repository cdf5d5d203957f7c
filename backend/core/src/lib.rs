pub mod error;
pub mod traits;
pub mod types;

pub use error::UpstreamError;
pub use traits::{CompletionProvider, SpeechProvider};
pub use types::{ConversationId, Service, VoiceInfo, DEFAULT_VOICE_ID};
