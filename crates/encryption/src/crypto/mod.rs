//! Cryptographic primitives behind [`crate::EncryptionService`].
//!
//! This module is intentionally free of configuration and logging setup.
//!
//! # Payload encoding
//!
//! ```text
//! { "encrypted": <hex>, "iv": <hex>, "authTag": <hex>, "algorithm": <id> }
//! ```
//!
//! The tag is kept detached from the ciphertext so the record matches what
//! existing `aes-256-gcm` producers store.

pub mod cipher;
pub mod key;
pub mod mac;
pub mod password;
pub mod random;

pub use key::{SecretKey, KEY_LEN};
