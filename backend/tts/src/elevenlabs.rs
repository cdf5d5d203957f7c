/// ElevenLabs text-to-speech and voice catalog client.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use voxrelay_core::{Service, SpeechProvider, UpstreamError, VoiceInfo};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

/// Tuning parameters sent with every synthesis request, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.75,
            similarity_boost: 0.75,
        }
    }
}

pub struct ElevenLabsTts {
    client: Client,
    base_url: String,
    model_id: String,
    settings: VoiceSettings,
    timeout: Option<Duration>,
}

impl ElevenLabsTts {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            settings: VoiceSettings::default(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_settings(mut self, settings: VoiceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, UpstreamError> {
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::transport(Service::ElevenLabs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::rejected(Service::ElevenLabs, status.as_u16(), &body));
        }
        Ok(response)
    }

    /// `{base}/text-to-speech/{voice_id}` with the id as one encoded segment.
    fn synthesis_url(&self, voice_id: &str) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| UpstreamError::transport(Service::ElevenLabs, e))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::transport(Service::ElevenLabs, "base URL cannot carry a path"))?
            .pop_if_empty()
            .push("text-to-speech")
            .push(voice_id);
        Ok(url)
    }
}

impl Default for ElevenLabsTts {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceInfo>,
}

#[async_trait]
impl SpeechProvider for ElevenLabsTts {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(
        &self,
        api_key: &str,
        text: &str,
        voice_id: &str,
    ) -> Result<Bytes, UpstreamError> {
        let url = self.synthesis_url(voice_id)?;
        let body = SynthesisBody {
            text,
            model_id: &self.model_id,
            voice_settings: self.settings,
        };
        info!("[TTS/ElevenLabs] Synthesizing voice_id={} chars={}", voice_id, text.chars().count());

        let request = self
            .client
            .post(url)
            .query(&[("optimize_streaming_latency", "0")])
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", api_key)
            .json(&body);

        let audio = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| UpstreamError::transport(Service::ElevenLabs, e))?;

        if audio.is_empty() {
            return Err(UpstreamError::Empty {
                service: Service::ElevenLabs,
            });
        }
        debug!(bytes = audio.len(), "ElevenLabs audio received");
        Ok(audio)
    }

    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceInfo>, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("Accept", "application/json")
            .header("xi-api-key", api_key);

        let catalog: VoicesResponse = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::decode(Service::ElevenLabs, e))?;

        info!("[TTS/ElevenLabs] Fetched {} voices", catalog.voices.len());
        Ok(catalog.voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ElevenLabsTts {
        ElevenLabsTts::new().with_base_url(server.uri())
    }

    #[tokio::test]
    async fn synthesize_posts_text_and_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice-1"))
            .and(query_param("optimize_streaming_latency", "0"))
            .and(header("xi-api-key", "el-key"))
            .and(header("accept", "audio/mpeg"))
            .and(body_json(json!({
                "text": "Hi there",
                "model_id": "eleven_monolingual_v1",
                "voice_settings": {"stability": 0.75, "similarity_boost": 0.75}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3mp3".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let audio = client(&server)
            .synthesize("el-key", "Hi there", "voice-1")
            .await
            .unwrap();
        assert_eq!(&audio[..], b"ID3mp3");
    }

    async fn synthesized_path(voice_id: &str) -> String {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
            .mount(&server)
            .await;

        client(&server).synthesize("k", "t", voice_id).await.unwrap();
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.query(), Some("optimize_streaming_latency=0"));
        requests[0].url.path().to_string()
    }

    #[tokio::test]
    async fn voice_id_fragment_marker_is_encoded() {
        assert_eq!(synthesized_path("abc#frag").await, "/text-to-speech/abc%23frag");
    }

    #[tokio::test]
    async fn voice_id_cannot_escape_its_segment() {
        assert_eq!(synthesized_path("../voices").await, "/text-to-speech/..%2Fvoices");
    }

    #[tokio::test]
    async fn base_path_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        ElevenLabsTts::new()
            .with_base_url(format!("{}/v1/", server.uri()))
            .synthesize("k", "t", "voice-1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn synthesize_rejection_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_api_key"))
            .mount(&server)
            .await;

        let err = client(&server).synthesize("bad", "x", "v").await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Rejected { service: Service::ElevenLabs, status: 401, .. }
        ));
    }

    #[tokio::test]
    async fn empty_audio_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client(&server).synthesize("k", "x", "v").await.unwrap_err();
        assert_eq!(err, UpstreamError::Empty { service: Service::ElevenLabs });
    }

    #[tokio::test]
    async fn list_voices_keeps_catalog_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/voices"))
            .and(header("xi-api-key", "el-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "voices": [
                    {"voice_id": "b", "name": "Bella", "category": "premade"},
                    {"voice_id": "a", "name": "Adam", "labels": {"accent": "american"}}
                ]
            })))
            .mount(&server)
            .await;

        let voices = client(&server).list_voices("el-key").await.unwrap();
        assert_eq!(
            voices,
            vec![VoiceInfo::new("b", "Bella"), VoiceInfo::new("a", "Adam")]
        );
    }

    #[tokio::test]
    async fn malformed_catalog_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "nope"})))
            .mount(&server)
            .await;

        let err = client(&server).list_voices("k").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
    }
}
