//! Slash-command layer: detection, routing, and the bot's command handlers.

pub mod detection;
pub mod dispatch;
pub mod filename;
pub mod handlers;
pub mod registry;
pub mod replies;
pub mod types;

use std::sync::Arc;

use voxrelay_core::Service;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::{
    BotServices, HelpHandler, QueryHandler, SetKeyHandler, SetVoiceHandler, StartHandler,
    VoicesHandler,
};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{CommandDef, CommandInvocation, Detection};

/// Build a dispatcher wired with every built-in handler.
pub fn build_dispatcher(services: BotServices) -> CommandDispatcher {
    let registry = CommandRegistry::new();
    let mut dispatcher = CommandDispatcher::new(registry.clone());

    dispatcher.register("start", Arc::new(StartHandler));
    dispatcher.register("help", Arc::new(HelpHandler { registry }));
    dispatcher.register("query", Arc::new(QueryHandler { services: services.clone() }));
    dispatcher.register("voices", Arc::new(VoicesHandler { services: services.clone() }));
    dispatcher.register("set_voice", Arc::new(SetVoiceHandler { store: services.store.clone() }));
    for service in Service::ALL {
        dispatcher.register(
            service.command(),
            Arc::new(SetKeyHandler { store: services.store.clone(), service }),
        );
    }
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use voxrelay_completion::MockCompletion;
    use voxrelay_core::{
        CompletionProvider, ConversationId, DEFAULT_VOICE_ID, SpeechProvider, UpstreamError,
        VoiceInfo,
    };
    use voxrelay_security::{CredentialCipher, CredentialStore, ProcessKey};
    use voxrelay_tts::{MockSpeech, SynthCall};

    const CHAT: ConversationId = ConversationId(1001);

    struct Harness {
        dispatcher: CommandDispatcher,
        store: Arc<CredentialStore>,
        completion: Arc<MockCompletion>,
        speech: Arc<MockSpeech>,
    }

    impl Harness {
        fn new(completion: MockCompletion, speech: MockSpeech) -> Self {
            let cipher = CredentialCipher::new(&ProcessKey::generate());
            Self::with_cipher(cipher, completion, speech)
        }

        fn with_cipher(cipher: CredentialCipher, completion: MockCompletion, speech: MockSpeech) -> Self {
            let store = Arc::new(CredentialStore::new(Arc::new(cipher)));
            let completion = Arc::new(completion);
            let speech = Arc::new(speech);
            let dispatcher = build_dispatcher(BotServices {
                store: store.clone(),
                completion: completion.clone() as Arc<dyn CompletionProvider>,
                speech: speech.clone() as Arc<dyn SpeechProvider>,
                default_voice_id: DEFAULT_VOICE_ID.to_string(),
            });
            Self { dispatcher, store, completion, speech }
        }

        async fn send(&self, text: &str) -> CommandResponse {
            self.dispatcher
                .handle_text(&CommandContext::new(CHAT), text)
                .await
                .expect("commands always get a reply")
        }

        async fn send_text(&self, text: &str) -> String {
            match self.send(text).await {
                CommandResponse::Text(reply) => reply,
                other => panic!("expected text, got {other:?}"),
            }
        }

        async fn configure_keys(&self) {
            self.send("/openai sk-x").await;
            self.send("/elevenlabs el-y").await;
        }
    }

    fn catalog() -> Vec<VoiceInfo> {
        vec![VoiceInfo::new("v-rachel", "Rachel"), VoiceInfo::new("v-bella", "Bella")]
    }

    #[tokio::test]
    async fn query_round_trip_delivers_named_audio() {
        let h = Harness::new(
            MockCompletion::new().with_reply("Hi there").with_reply("Friendly Greeting"),
            MockSpeech::new().with_audio(Ok(Bytes::from_static(b"ID3 audio"))),
        );
        assert_eq!(
            h.send_text("/openai sk-x").await,
            "OpenAI API key has been configured successfully."
        );
        assert_eq!(
            h.send_text("/elevenlabs el-y").await,
            "ElevenLabs API key has been configured successfully."
        );

        let (bytes, filename) = match h.send("/query hello").await {
            CommandResponse::Audio { bytes, filename } => (bytes, filename),
            other => panic!("expected audio, got {other:?}"),
        };
        assert_eq!(&bytes[..], b"ID3 audio");
        assert_eq!(filename, "Friendly_Greeting.mp3");

        let calls = h.completion.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("sk-x".to_string(), "hello".to_string()));
        assert!(calls[1].1.ends_with("Hi there"));
        assert_eq!(
            h.speech.synth_calls(),
            vec![SynthCall {
                api_key: "el-y".into(),
                text: "Hi there".into(),
                voice_id: DEFAULT_VOICE_ID.into(),
            }]
        );
    }

    #[tokio::test]
    async fn query_without_any_key_asks_for_both() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        assert_eq!(h.send_text("/query hello").await, replies::KEYS_NOT_CONFIGURED);
        assert_eq!(h.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn query_without_voice_key_skips_completion() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.send("/openai sk-x").await;

        let reply = h.send_text("/query hello").await;
        assert!(reply.starts_with("ElevenLabs API key is not configured"));
        assert_eq!(h.completion.call_count(), 0);
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn query_without_openai_key_names_openai() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.send("/elevenlabs el-y").await;
        assert_eq!(
            h.send_text("/query hello").await,
            replies::key_not_configured(Service::OpenAi)
        );
    }

    #[tokio::test]
    async fn query_without_text_shows_usage() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.configure_keys().await;
        assert_eq!(h.send_text("/query   ").await, replies::QUERY_USAGE);
        assert_eq!(h.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn synthesis_failure_is_the_generic_reply() {
        let h = Harness::new(
            MockCompletion::new().with_reply("Hi there"),
            MockSpeech::new().with_audio(Err(UpstreamError::rejected(
                Service::ElevenLabs,
                401,
                "invalid_api_key",
            ))),
        );
        h.configure_keys().await;

        assert_eq!(h.send_text("/query hello").await, replies::GENERIC_ERROR);
        // No filename request once synthesis has failed.
        assert_eq!(h.completion.call_count(), 1);
    }

    #[tokio::test]
    async fn filename_failure_sends_no_audio() {
        let h = Harness::new(
            MockCompletion::new()
                .with_reply("Hi there")
                .with_failure(UpstreamError::rejected(Service::OpenAi, 500, "server error")),
            MockSpeech::new(),
        );
        h.configure_keys().await;

        assert_eq!(
            h.send("/query hello").await,
            CommandResponse::text(replies::GENERIC_ERROR)
        );
        assert_eq!(h.completion.call_count(), 2);
        assert_eq!(h.speech.synth_calls().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_key_asks_to_set_it_again() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.configure_keys().await;
        let foreign = CredentialCipher::new(&ProcessKey::generate())
            .encrypt("sk-x")
            .unwrap();
        h.store.replace_ciphertext(CHAT, Service::OpenAi, foreign).await;

        assert_eq!(
            h.send_text("/query hello").await,
            replies::key_unreadable(Service::OpenAi)
        );
        assert_eq!(h.completion.call_count(), 0);
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn truncated_voice_key_blocks_the_catalog() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new().with_voices(Ok(catalog())));
        h.store.replace_ciphertext(CHAT, Service::ElevenLabs, vec![1, 2, 3]).await;

        assert_eq!(
            h.send_text("/voices").await,
            replies::key_unreadable(Service::ElevenLabs)
        );
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_completion_is_the_generic_reply() {
        let h = Harness::new(MockCompletion::new().with_reply(""), MockSpeech::new());
        h.configure_keys().await;

        assert_eq!(h.send_text("/query hello").await, replies::GENERIC_ERROR);
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn voices_without_key_makes_no_request() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new().with_voices(Ok(catalog())));
        let reply = h.send_text("/voices").await;
        assert!(reply.contains("ElevenLabs API key is not configured"));
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn voices_lists_and_caches_the_catalog() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new().with_voices(Ok(catalog())));
        h.send("/elevenlabs el-y").await;

        let reply = h.send_text("/voices").await;
        assert_eq!(reply, replies::voice_list(&catalog()));
        assert_eq!(h.speech.catalog_calls(), vec!["el-y".to_string()]);
        let record = h.store.snapshot(CHAT).await.unwrap();
        assert_eq!(record.cached_voices, Some(catalog()));
    }

    #[tokio::test]
    async fn empty_catalog_reports_no_voices() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.send("/elevenlabs el-y").await;
        assert_eq!(h.send_text("/voices").await, replies::NO_VOICES);
    }

    #[tokio::test]
    async fn catalog_failure_is_reported() {
        let h = Harness::new(
            MockCompletion::new(),
            MockSpeech::new().with_voices(Err(UpstreamError::transport(Service::ElevenLabs, "timed out"))),
        );
        h.send("/elevenlabs el-y").await;
        assert_eq!(h.send_text("/voices").await, replies::VOICES_ERROR);
    }

    #[tokio::test]
    async fn set_voice_by_id_needs_no_catalog() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        assert_eq!(
            h.send_text("/set_voice -id abc123").await,
            "Voice ID set to `abc123` successfully."
        );
        assert_eq!(h.store.voice_id(CHAT).await.as_deref(), Some("abc123"));
        assert_eq!(h.speech.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_voice_ids_are_rejected() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        for input in ["/set_voice -id ../voices", "/set_voice -id abc#frag"] {
            assert_eq!(h.send_text(input).await, replies::INVALID_VOICE_ID);
        }
        assert_eq!(h.store.voice_id(CHAT).await, None);
    }

    #[tokio::test]
    async fn set_voice_by_name_uses_the_cached_catalog() {
        let h = Harness::new(
            MockCompletion::new().with_reply("Hi").with_reply("hi"),
            MockSpeech::new().with_voices(Ok(catalog())),
        );
        h.configure_keys().await;

        assert_eq!(h.send_text("/set_voice bella").await, replies::CATALOG_MISSING);
        h.send("/voices").await;
        assert_eq!(
            h.send_text("/set_voice bella").await,
            "Voice `Bella` set successfully, ID set to v-bella."
        );
        assert_eq!(h.send_text("/set_voice Nobody").await, replies::INVALID_VOICE);

        h.send("/query hello").await;
        assert_eq!(h.speech.synth_calls()[0].voice_id, "v-bella");
    }

    #[tokio::test]
    async fn set_voice_without_argument_shows_usage() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        assert_eq!(h.send_text("/set_voice").await, replies::SET_VOICE_USAGE);
        assert_eq!(h.send_text("/set_voice -id").await, replies::SET_VOICE_USAGE);
    }

    #[tokio::test]
    async fn key_command_without_argument_shows_usage() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        assert_eq!(h.send_text("/openai").await, replies::key_usage(Service::OpenAi));
        assert!(!h.store.has_record(CHAT).await);
    }

    #[tokio::test]
    async fn unconfigured_cipher_refuses_to_store_keys() {
        let h = Harness::with_cipher(CredentialCipher::unconfigured(), MockCompletion::new(), MockSpeech::new());
        assert_eq!(h.send_text("/openai sk-x").await, replies::KEY_STORE_UNAVAILABLE);
        assert!(!h.store.has_record(CHAT).await);
    }

    #[tokio::test]
    async fn conversations_do_not_share_keys() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        h.configure_keys().await;

        let other = CommandContext::new(ConversationId(2002));
        let reply = h.dispatcher.handle_text(&other, "/query hello").await.unwrap();
        assert_eq!(reply, CommandResponse::text(replies::KEYS_NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn start_and_help_replies() {
        let h = Harness::new(MockCompletion::new(), MockSpeech::new());
        assert_eq!(h.send_text("/start").await, replies::WELCOME);
        let help = h.send_text("/commands").await;
        assert!(help.contains("/set_voice {name or -id ID}"));
        assert_eq!(help, h.send_text("/help").await);
    }
}
