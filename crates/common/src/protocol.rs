//! Wire types for encrypted payloads.
//!
//! [`EncryptedPayload`] is serialised as JSON for storage in a database column
//! or file:
//!
//! ```text
//! { "encrypted": <hex>, "iv": <hex>, "authTag": <hex>, "algorithm": "aes-256-gcm" }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// AEAD construction used to seal a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// AES-256-GCM with a 16-byte IV.
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    /// AES-256-GCM-SIV (RFC 8452) with a 12-byte nonce.
    #[serde(rename = "aes-256-gcm-siv")]
    Aes256GcmSiv,
}

impl Algorithm {
    /// Identifier carried in [`EncryptedPayload::algorithm`].
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::Aes256GcmSiv => "aes-256-gcm-siv",
        }
    }

    /// IV / nonce length in bytes.
    pub fn iv_len(self) -> usize {
        match self {
            Algorithm::Aes256Gcm => 16,
            Algorithm::Aes256GcmSiv => 12,
        }
    }

    /// Authentication tag length in bytes.
    pub fn tag_len(self) -> usize {
        16
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aes-256-gcm" => Ok(Algorithm::Aes256Gcm),
            "aes-256-gcm-siv" => Ok(Algorithm::Aes256GcmSiv),
            other => Err(CryptoError::Configuration(format!(
                "unsupported algorithm: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Encrypted payload
// ---------------------------------------------------------------------------

/// Output of one `encrypt` call; input to one `decrypt` call.
///
/// All byte sequences are lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Ciphertext, same length as the plaintext.
    #[serde(rename = "encrypted", default)]
    pub ciphertext: String,

    /// Per-encryption IV, never reused under the same key.
    #[serde(default)]
    pub iv: String,

    /// AEAD authentication tag.
    #[serde(rename = "authTag", default)]
    pub auth_tag: String,

    /// Advisory cipher identifier, checked against the service configuration
    /// before decryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl EncryptedPayload {
    /// Serialise to the JSON storage format.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self)
            .map_err(|e| CryptoError::InvalidInput(format!("payload serialisation failed: {e}")))
    }

    /// Parse a payload from its JSON storage format.
    ///
    /// Missing fields deserialise as empty strings and are rejected later by
    /// `decrypt`, so a truncated record never reaches the cipher.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidInput`] if `json` is not a payload object.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json)
            .map_err(|e| CryptoError::InvalidInput(format!("malformed payload: {e}")))
    }

    /// Name of the first required field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.ciphertext.is_empty() {
            Some("encrypted")
        } else if self.iv.is_empty() {
            Some("iv")
        } else if self.auth_tag.is_empty() {
            Some("authTag")
        } else {
            None
        }
    }
}
