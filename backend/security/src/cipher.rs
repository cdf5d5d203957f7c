//! Process-wide symmetric encryption for short secrets (upstream API keys).
//!
//! One XChaCha20-Poly1305 key protects every conversation's secrets. Each
//! ciphertext is laid out as `nonce || sealed`, with a fresh random 24-byte
//! nonce per call. There is no per-user derivation and no rotation: losing
//! the process key invalidates everything encrypted under it.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use tracing::{debug, warn};

use crate::error::CipherError;

const NONCE_SIZE: usize = 24;
const KEY_SIZE: usize = 32;

/// The 256-bit process key.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcessKey([u8; KEY_SIZE]);

impl std::fmt::Debug for ProcessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProcessKey([REDACTED])")
    }
}

impl ProcessKey {
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Decode a base64 key. URL-safe (Fernet style) and standard alphabets are both accepted.
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        let encoded = encoded.trim();
        let bytes = URL_SAFE
            .decode(encoded)
            .or_else(|_| STANDARD.decode(encoded))
            .map_err(|e| CipherError::InvalidKey(format!("not valid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            CipherError::InvalidKey(format!(
                "key must be {KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(self.0)
    }
}

/// Where the process key came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Configured,
    Generated,
}

/// Encrypts and decrypts secrets with the process key.
pub struct CredentialCipher {
    cipher: Option<XChaCha20Poly1305>,
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl CredentialCipher {
    pub fn new(key: &ProcessKey) -> Self {
        Self {
            cipher: Some(XChaCha20Poly1305::new(Key::from_slice(&key.0))),
        }
    }

    /// A cipher with no key; every operation fails with `KeyNotConfigured`.
    pub fn unconfigured() -> Self {
        Self { cipher: None }
    }

    /// Use the configured base64 key, or generate one for this process lifetime.
    pub fn from_config(encoded: Option<&str>) -> Result<(Self, KeyOrigin), CipherError> {
        match encoded.map(str::trim).filter(|k| !k.is_empty()) {
            Some(encoded) => {
                let key = ProcessKey::from_base64(encoded)?;
                debug!("Loaded configured process key");
                Ok((Self::new(&key), KeyOrigin::Configured))
            }
            None => {
                warn!("No encryption key configured; generated a process key for this run only");
                Ok((Self::new(&ProcessKey::generate()), KeyOrigin::Generated))
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.cipher.is_some()
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CipherError> {
        let cipher = self.cipher.as_ref().ok_or(CipherError::KeyNotConfigured)?;

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let sealed = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<String, CipherError> {
        let cipher = self.cipher.as_ref().ok_or(CipherError::KeyNotConfigured)?;

        if ciphertext.len() < NONCE_SIZE {
            return Err(CipherError::InvalidCiphertext);
        }
        let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);

        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| {
                warn!("Decryption failed; ciphertext corrupted or process key changed");
                CipherError::InvalidCiphertext
            })?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidCiphertext)
    }
}
