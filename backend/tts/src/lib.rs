pub mod elevenlabs;
pub mod mock;

pub use elevenlabs::{ElevenLabsTts, VoiceSettings};
pub use mock::{MockSpeech, SynthCall};
