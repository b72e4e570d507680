//! Error taxonomy shared by the encryption service and its callers.

use thiserror::Error;

/// Top-level error type returned by every public encryption service operation.
///
/// Variants fall into two groups:
/// - caller-correctable: [`CryptoError::InvalidInput`], [`CryptoError::AlgorithmMismatch`]
/// - terminal for the operation: everything else
///
/// None of them are retryable; all operations are local and deterministic in cost.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Missing or malformed key, unknown algorithm, or out-of-range setting.
    /// The service cannot be constructed in this state.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller passed an empty plaintext or a malformed payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The payload declares a different cipher than the one this service runs.
    #[error("algorithm mismatch: expected {expected}, found {found}")]
    AlgorithmMismatch {
        /// Algorithm the service is configured with.
        expected: String,
        /// Algorithm declared by the payload.
        found: String,
    },

    /// The AEAD primitive failed while encrypting.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication failed: tampered data, wrong key, or corruption.
    ///
    /// Deliberately carries no detail.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The adaptive password hash could not be computed.
    #[error("password hashing failed: {0}")]
    PasswordHashing(String),
}

impl CryptoError {
    /// Short machine-readable code for this error, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::Configuration(_) => "configuration_error",
            CryptoError::InvalidInput(_) => "invalid_input",
            CryptoError::AlgorithmMismatch { .. } => "algorithm_mismatch",
            CryptoError::EncryptionFailed(_) => "encryption_failed",
            CryptoError::DecryptionFailed => "decryption_failed",
            CryptoError::PasswordHashing(_) => "password_hashing_failed",
        }
    }

    /// Returns `true` when the caller can fix the request and try again.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidInput(_) | CryptoError::AlgorithmMismatch { .. }
        )
    }
}
