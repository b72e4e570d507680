//! Wire types and errors shared by the encryption service and its callers.

pub mod error;
pub mod protocol;

pub use error::CryptoError;
pub use protocol::{Algorithm, EncryptedPayload};
