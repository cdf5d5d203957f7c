//! Secret handling for voxrelay: the process-wide credential cipher and the
//! per-conversation credential store built on top of it.

pub mod cipher;
pub mod error;
pub mod store;

pub use cipher::{CredentialCipher, KeyOrigin, ProcessKey};
pub use error::{CipherError, StoreError};
pub use store::{CredentialStore, UserRecord};
