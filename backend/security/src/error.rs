use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("encryption key is not configured")]
    KeyNotConfigured,

    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("invalid ciphertext or wrong encryption key")]
    InvalidCiphertext,

    #[error("encryption failed")]
    EncryptionFailed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Selection by name needs a catalog fetched earlier in this process.
    #[error("voice catalog has not been fetched")]
    CatalogMissing,

    #[error("no voice matches '{0}'")]
    NoMatch(String),
}
