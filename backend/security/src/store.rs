//! In-memory credential store, one record per conversation.
//!
//! Records are never persisted and disappear when the process exits. Every
//! record sits behind its own async mutex so that concurrent commands for the
//! same conversation cannot lose each other's updates, while different
//! conversations never wait on one another.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use voxrelay_core::{ConversationId, Service, VoiceInfo};

use crate::cipher::CredentialCipher;
use crate::error::StoreError;

/// Everything remembered about one conversation.
#[derive(Clone, Default)]
pub struct UserRecord {
    pub openai_key: Option<Vec<u8>>,
    pub elevenlabs_key: Option<Vec<u8>>,
    pub voice_id: Option<String>,
    pub cached_voices: Option<Vec<VoiceInfo>>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sealed = |k: &Option<Vec<u8>>| if k.is_some() { "[ENCRYPTED]" } else { "none" };
        f.debug_struct("UserRecord")
            .field("openai_key", &sealed(&self.openai_key))
            .field("elevenlabs_key", &sealed(&self.elevenlabs_key))
            .field("voice_id", &self.voice_id)
            .field("cached_voices", &self.cached_voices.as_ref().map(Vec::len))
            .finish()
    }
}

impl UserRecord {
    fn key_slot(&mut self, service: Service) -> &mut Option<Vec<u8>> {
        match service {
            Service::OpenAi => &mut self.openai_key,
            Service::ElevenLabs => &mut self.elevenlabs_key,
        }
    }

    pub fn encrypted_key(&self, service: Service) -> Option<&[u8]> {
        match service {
            Service::OpenAi => self.openai_key.as_deref(),
            Service::ElevenLabs => self.elevenlabs_key.as_deref(),
        }
    }

    /// Case-insensitive lookup: every name first, then every id.
    fn resolve_voice(&self, name_or_id: &str) -> Result<VoiceInfo, StoreError> {
        let voices = self.cached_voices.as_ref().ok_or(StoreError::CatalogMissing)?;
        let wanted = name_or_id.trim().to_lowercase();

        voices
            .iter()
            .find(|v| v.name.to_lowercase() == wanted)
            .or_else(|| voices.iter().find(|v| v.voice_id.to_lowercase() == wanted))
            .cloned()
            .ok_or_else(|| StoreError::NoMatch(name_or_id.trim().to_string()))
    }
}

type Slot = Arc<Mutex<UserRecord>>;

#[derive(Debug)]
pub struct CredentialStore {
    cipher: Arc<CredentialCipher>,
    records: RwLock<HashMap<ConversationId, Slot>>,
}

impl CredentialStore {
    pub fn new(cipher: Arc<CredentialCipher>) -> Self {
        Self {
            cipher,
            records: RwLock::new(HashMap::new()),
        }
    }

    async fn existing(&self, id: ConversationId) -> Option<Slot> {
        self.records.read().await.get(&id).cloned()
    }

    async fn get_or_create(&self, id: ConversationId) -> Slot {
        if let Some(slot) = self.existing(id).await {
            return slot;
        }
        let mut records = self.records.write().await;
        records
            .entry(id)
            .or_insert_with(|| {
                debug!(conversation = %id, "Created credential record");
                Arc::new(Mutex::new(UserRecord::default()))
            })
            .clone()
    }

    pub async fn has_record(&self, id: ConversationId) -> bool {
        self.records.read().await.contains_key(&id)
    }

    /// Encrypt and store `raw_key`, creating the conversation's record if needed.
    pub async fn set_key(
        &self,
        id: ConversationId,
        service: Service,
        raw_key: &str,
    ) -> Result<(), StoreError> {
        // Encrypt before touching the store so a cipher failure leaves no empty record behind.
        let sealed = self.cipher.encrypt(raw_key.trim())?;
        let slot = self.get_or_create(id).await;
        *slot.lock().await.key_slot(service) = Some(sealed);
        info!(conversation = %id, service = %service, "Stored API key");
        Ok(())
    }

    /// The plaintext key for `service`, or `None` when it was never set.
    pub async fn decrypted_key(
        &self,
        id: ConversationId,
        service: Service,
    ) -> Result<Option<String>, StoreError> {
        let Some(slot) = self.existing(id).await else {
            return Ok(None);
        };
        let sealed = slot.lock().await.encrypted_key(service).map(<[u8]>::to_vec);
        match sealed {
            Some(sealed) => Ok(Some(self.cipher.decrypt(&sealed)?)),
            None => Ok(None),
        }
    }

    pub async fn set_voice(&self, id: ConversationId, voice_id: &str) {
        let slot = self.get_or_create(id).await;
        slot.lock().await.voice_id = Some(voice_id.to_string());
        info!(conversation = %id, voice_id, "Selected voice");
    }

    /// The explicitly selected voice, if any.
    pub async fn voice_id(&self, id: ConversationId) -> Option<String> {
        let slot = self.existing(id).await?;
        let voice = slot.lock().await.voice_id.clone();
        voice
    }

    pub async fn resolve_voice(
        &self,
        id: ConversationId,
        name_or_id: &str,
    ) -> Result<VoiceInfo, StoreError> {
        let slot = self.existing(id).await.ok_or(StoreError::CatalogMissing)?;
        let record = slot.lock().await;
        record.resolve_voice(name_or_id)
    }

    /// Resolve against the cached catalog and store the match under one lock.
    pub async fn select_voice(
        &self,
        id: ConversationId,
        name_or_id: &str,
    ) -> Result<VoiceInfo, StoreError> {
        let slot = self.existing(id).await.ok_or(StoreError::CatalogMissing)?;
        let mut record = slot.lock().await;
        let voice = record.resolve_voice(name_or_id)?;
        record.voice_id = Some(voice.voice_id.clone());
        info!(conversation = %id, voice_id = %voice.voice_id, name = %voice.name, "Selected voice from catalog");
        Ok(voice)
    }

    pub async fn cache_voices(&self, id: ConversationId, voices: Vec<VoiceInfo>) {
        let slot = self.get_or_create(id).await;
        debug!(conversation = %id, count = voices.len(), "Cached voice catalog");
        slot.lock().await.cached_voices = Some(voices);
    }

    /// Overwrite a stored ciphertext as-is, creating the record if needed.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn replace_ciphertext(&self, id: ConversationId, service: Service, sealed: Vec<u8>) {
        let slot = self.get_or_create(id).await;
        *slot.lock().await.key_slot(service) = Some(sealed);
    }

    /// A copy of the conversation's record.
    pub async fn snapshot(&self, id: ConversationId) -> Option<UserRecord> {
        let slot = self.existing(id).await?;
        let record = slot.lock().await.clone();
        Some(record)
    }
}
