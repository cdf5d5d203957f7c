use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use voxrelay_core::{SpeechProvider, UpstreamError, VoiceInfo};

/// A speech provider with canned audio and catalog that records every call.
pub struct MockSpeech {
    audio: Result<Bytes, UpstreamError>,
    voices: Result<Vec<VoiceInfo>, UpstreamError>,
    synth_calls: Mutex<Vec<SynthCall>>,
    catalog_calls: Mutex<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthCall {
    pub api_key: String,
    pub text: String,
    pub voice_id: String,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            audio: Ok(Bytes::from_static(b"ID3 mock audio")),
            voices: Ok(Vec::new()),
            synth_calls: Mutex::new(Vec::new()),
            catalog_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_audio(mut self, audio: Result<Bytes, UpstreamError>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_voices(mut self, voices: Result<Vec<VoiceInfo>, UpstreamError>) -> Self {
        self.voices = voices;
        self
    }

    pub fn synth_calls(&self) -> Vec<SynthCall> {
        self.synth_calls.lock().unwrap().clone()
    }

    /// API keys used for each catalog request.
    pub fn catalog_calls(&self) -> Vec<String> {
        self.catalog_calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.synth_calls.lock().unwrap().len() + self.catalog_calls.lock().unwrap().len()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeech {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: &str,
    ) -> Result<Bytes, UpstreamError> {
        self.synth_calls.lock().unwrap().push(SynthCall {
            api_key: api_key.to_string(),
            text: text.to_string(),
            voice_id: voice_id.to_string(),
        });
        self.audio.clone()
    }

    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceInfo>, UpstreamError> {
        self.catalog_calls.lock().unwrap().push(api_key.to_string());
        self.voices.clone()
    }
}
