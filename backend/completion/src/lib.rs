//! Chat-completion providers.

pub mod mock;
pub mod openai;

pub use mock::MockCompletion;
pub use openai::OpenAiCompletion;
