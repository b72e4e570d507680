//! Authenticated encryption service.
//!
//! [`EncryptionService`] seals short text payloads (stored secrets, tokens)
//! with a 256-bit AEAD key and provides the supporting primitives: random
//! tokens, SHA-256 fingerprints, HMAC signatures with constant-time
//! verification, and bcrypt password hashing.
//!
//! ```no_run
//! use encryption::{Config, EncryptionService};
//!
//! # fn main() -> Result<(), encryption::CryptoError> {
//! let cfg = Config::from_env()?;
//! let svc = EncryptionService::new(&cfg)?;
//! let payload = svc.encrypt("hello world")?;
//! assert_eq!(svc.decrypt(&payload)?, "hello world");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod service;
pub mod telemetry;

pub use common::{Algorithm, CryptoError, EncryptedPayload};
pub use config::Config;
pub use service::{EncryptionService, DEFAULT_TOKEN_LEN};
