//! [`EncryptionService`]: authenticated encryption, MACs, tokens and password
//! hashing under one immutable service key.

use std::sync::Arc;

use common::{Algorithm, CryptoError, EncryptedPayload};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::config::Config;
use crate::crypto::cipher::{self, CipherError};
use crate::crypto::{mac, password, random, SecretKey};

pub use crate::crypto::random::DEFAULT_TOKEN_LEN;

/// Encryption service bound to one key and one AEAD construction.
///
/// Cheap to clone; the key is shared behind an `Arc` and never mutated after
/// construction, so the service can be used from many tasks at once.
#[derive(Clone, Debug)]
pub struct EncryptionService {
    key: Arc<SecretKey>,
    algorithm: Algorithm,
    bcrypt_cost: u32,
}

impl EncryptionService {
    /// Build a service from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if the key is missing, not 64
    /// hex characters, or all zeroes, or if the algorithm or bcrypt cost is
    /// invalid.
    pub fn new(cfg: &Config) -> Result<Self, CryptoError> {
        let key = SecretKey::from_hex(&cfg.encryption_key)?;
        let algorithm = cfg.algorithm()?;
        let bcrypt_cost = cfg.checked_bcrypt_cost()?;

        info!(algorithm = %algorithm, bcrypt_cost, "encryption service initialised");
        Ok(Self {
            key: Arc::new(key),
            algorithm,
            bcrypt_cost,
        })
    }

    /// The configured AEAD construction.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    // -----------------------------------------------------------------------
    // Authenticated encryption
    // -----------------------------------------------------------------------

    /// Encrypt `plaintext` under the service key with a fresh random IV.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] for an empty plaintext and
    /// [`CryptoError::EncryptionFailed`] if the cipher fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedPayload, CryptoError> {
        if plaintext.is_empty() {
            return Err(CryptoError::InvalidInput(
                "plaintext must be a non-empty string".into(),
            ));
        }

        let sealed = cipher::seal(self.algorithm, &self.key, plaintext.as_bytes()).map_err(|e| {
            warn!(algorithm = %self.algorithm, error = %e, "encryption failed");
            CryptoError::EncryptionFailed(e.to_string())
        })?;

        debug!(algorithm = %self.algorithm, len = plaintext.len(), "payload encrypted");
        Ok(EncryptedPayload {
            ciphertext: hex::encode(&sealed.ciphertext),
            iv: hex::encode(&sealed.iv),
            auth_tag: hex::encode(&sealed.tag),
            algorithm: Some(self.algorithm.as_str().to_owned()),
        })
    }

    /// Authenticate and decrypt a payload produced by [`Self::encrypt`].
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidInput`]: a required field is empty, not hex, or
    ///   the IV/tag has the wrong length.
    /// - [`CryptoError::AlgorithmMismatch`]: the payload declares another
    ///   algorithm; the cipher is not attempted.
    /// - [`CryptoError::DecryptionFailed`]: wrong key, tampering, corruption,
    ///   or plaintext that is not UTF-8. No partial plaintext is returned.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<String, CryptoError> {
        if let Some(field) = payload.missing_field() {
            return Err(CryptoError::InvalidInput(format!(
                "payload is missing `{field}`"
            )));
        }
        if let Some(found) = payload.algorithm.as_deref() {
            if found != self.algorithm.as_str() {
                warn!(expected = %self.algorithm, found, "payload algorithm mismatch");
                return Err(CryptoError::AlgorithmMismatch {
                    expected: self.algorithm.as_str().to_owned(),
                    found: found.to_owned(),
                });
            }
        }

        let iv = decode_field("iv", &payload.iv)?;
        let ciphertext = decode_field("encrypted", &payload.ciphertext)?;
        let tag = decode_field("authTag", &payload.auth_tag)?;

        let plaintext = cipher::open(self.algorithm, &self.key, &iv, &ciphertext, &tag).map_err(
            |e| match e {
                CipherError::InvalidIvLength { .. } | CipherError::InvalidTagLength { .. } => {
                    CryptoError::InvalidInput(e.to_string())
                }
                CipherError::InvalidKeyLength | CipherError::AeadFailure => {
                    warn!(algorithm = %self.algorithm, "payload failed authentication");
                    CryptoError::DecryptionFailed
                }
            },
        )?;

        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            warn!("decrypted payload is not valid UTF-8");
            CryptoError::DecryptionFailed
        })
    }

    /// Parse a stored JSON payload and decrypt it.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] if `json` is not a payload object,
    /// otherwise the same errors as [`Self::decrypt`].
    pub fn decrypt_json(&self, json: &str) -> Result<String, CryptoError> {
        let payload = EncryptedPayload::from_json(json)?;
        self.decrypt(&payload)
    }

    // -----------------------------------------------------------------------
    // Keys and tokens
    // -----------------------------------------------------------------------

    /// Fresh random 32-byte key, hex-encoded, for provisioning new services.
    pub fn generate_key() -> String {
        SecretKey::generate().to_hex()
    }

    /// `length` random bytes, hex-encoded. Use [`DEFAULT_TOKEN_LEN`] for
    /// session and reset tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] if `length` is zero.
    pub fn generate_secure_token(length: usize) -> Result<String, CryptoError> {
        if length == 0 {
            return Err(CryptoError::InvalidInput(
                "token length must be greater than zero".into(),
            ));
        }
        Ok(random::secure_token(length))
    }

    // -----------------------------------------------------------------------
    // Hashing and MACs
    // -----------------------------------------------------------------------

    /// SHA-256 of `data`, hex-encoded.
    pub fn hash(data: impl AsRef<[u8]>) -> String {
        mac::sha256_hex(data.as_ref())
    }

    /// HMAC-SHA256 of `data`, hex-encoded.
    ///
    /// Keyed by the UTF-8 bytes of `secret` when given, else by the service key.
    pub fn create_hmac(&self, data: &str, secret: Option<&str>) -> String {
        mac::hmac_sha256_hex(self.mac_key(secret), data.as_bytes())
    }

    /// Constant-time check of `signature` against the HMAC of `data`.
    pub fn verify_hmac(&self, data: &str, signature: &str, secret: Option<&str>) -> bool {
        mac::verify_hmac_sha256(self.mac_key(secret), data.as_bytes(), signature)
    }

    fn mac_key<'a>(&'a self, secret: Option<&'a str>) -> &'a [u8] {
        match secret {
            Some(s) => s.as_bytes(),
            None => self.key.as_bytes(),
        }
    }

    // -----------------------------------------------------------------------
    // Passwords
    // -----------------------------------------------------------------------

    /// bcrypt hash of `password` at the configured cost.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::PasswordHashing`] if hashing fails.
    pub async fn hash_password(&self, password: &str) -> Result<String, CryptoError> {
        password::hash(password, self.bcrypt_cost).await
    }

    /// bcrypt hash of `password` at an explicit cost.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] for a cost outside 4..=31 and
    /// [`CryptoError::PasswordHashing`] if hashing fails.
    pub async fn hash_password_with_cost(
        &self,
        password: &str,
        cost: u32,
    ) -> Result<String, CryptoError> {
        password::hash(password, cost).await
    }

    /// Whether `password` matches a stored bcrypt hash. Never says why not.
    pub async fn verify_password(&self, password: &str, hash: &str) -> bool {
        password::verify(password, hash).await
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(value).map_err(|_| CryptoError::InvalidInput(format!("`{name}` is not valid hex")))
}
