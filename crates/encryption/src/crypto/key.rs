//! [`SecretKey`]: the process-wide 256-bit service key.

use common::CryptoError;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Errors produced while loading key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No key was supplied.
    #[error("ENCRYPTION_KEY is required and must not be empty")]
    Missing,

    /// The hex string has the wrong number of characters.
    #[error("ENCRYPTION_KEY must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    /// The string contains non-hex characters.
    #[error("ENCRYPTION_KEY must be hex-encoded")]
    InvalidHex,

    /// Every byte is zero.
    #[error("ENCRYPTION_KEY must not be all zeroes")]
    AllZero,
}

impl From<KeyError> for CryptoError {
    fn from(e: KeyError) -> Self {
        CryptoError::Configuration(e.to_string())
    }
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// The memory is overwritten with zeroes on drop.
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Decode a key from exactly 64 hex characters.
    ///
    /// A single trailing line ending (as left by `echo` or a secrets file) is
    /// dropped; any other whitespace counts towards the length.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if `hex_key` is empty, not exactly 64 hex
    /// characters, or decodes to an all-zero key.
    pub fn from_hex(hex_key: &str) -> Result<Self, KeyError> {
        let hex_key = strip_line_ending(hex_key);
        if hex_key.is_empty() {
            return Err(KeyError::Missing);
        }
        if hex_key.len() != KEY_LEN * 2 {
            return Err(KeyError::InvalidLength(hex_key.len()));
        }
        let mut key = Self(Box::new([0u8; KEY_LEN]));
        hex::decode_to_slice(hex_key, &mut key.0[..]).map_err(|_| KeyError::InvalidHex)?;
        if key.0.iter().all(|b| *b == 0) {
            return Err(KeyError::AllZero);
        }
        Ok(key)
    }

    /// Fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        random::fill(&mut buf[..]);
        Self(buf)
    }

    /// Hex encoding, for provisioning only.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0[..])
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_hex() {
        let hex_key = "ab".repeat(KEY_LEN);
        let key = SecretKey::from_hex(&hex_key).unwrap();
        assert_eq!(key.as_bytes(), &[0xABu8; KEY_LEN][..]);
        assert_eq!(key.to_hex(), hex_key);
    }

    #[test]
    fn accepts_uppercase_hex() {
        assert!(SecretKey::from_hex(&"AB".repeat(KEY_LEN)).is_ok());
    }

    #[test]
    fn rejects_all_zero_key() {
        let err = SecretKey::from_hex(&"0".repeat(64)).unwrap_err();
        assert!(matches!(err, KeyError::AllZero));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            SecretKey::from_hex(&"a".repeat(63)),
            Err(KeyError::InvalidLength(63))
        ));
        assert!(matches!(
            SecretKey::from_hex(&"a".repeat(66)),
            Err(KeyError::InvalidLength(66))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            SecretKey::from_hex(&"zz".repeat(KEY_LEN)),
            Err(KeyError::InvalidHex)
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(SecretKey::from_hex(""), Err(KeyError::Missing)));
        assert!(matches!(SecretKey::from_hex("\n"), Err(KeyError::Missing)));
    }

    #[test]
    fn padded_key_is_not_trimmed() {
        let hex_key = "ab".repeat(KEY_LEN);
        assert!(matches!(
            SecretKey::from_hex(&format!(" {hex_key}\n")),
            Err(KeyError::InvalidLength(65))
        ));
        assert!(matches!(
            SecretKey::from_hex(&format!("{hex_key} ")),
            Err(KeyError::InvalidLength(65))
        ));
        assert!(matches!(
            SecretKey::from_hex("   "),
            Err(KeyError::InvalidLength(3))
        ));
    }

    #[test]
    fn single_trailing_line_ending_is_dropped() {
        let hex_key = "ab".repeat(KEY_LEN);
        assert!(SecretKey::from_hex(&format!("{hex_key}\n")).is_ok());
        assert!(SecretKey::from_hex(&format!("{hex_key}\r\n")).is_ok());
        assert!(SecretKey::from_hex(&format!("{hex_key}\n\n")).is_err());
    }

    #[test]
    fn zeroized_on_drop() {
        fn assert_zeroize_on_drop<T: ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<SecretKey>();

        let mut key = SecretKey::from_hex(&"ab".repeat(KEY_LEN)).unwrap();
        key.0.zeroize();
        assert!(key.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn generated_keys_differ() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.to_hex().len(), KEY_LEN * 2);
    }

    #[test]
    fn redacted_in_debug() {
        let key = SecretKey::from_hex(&"ff".repeat(KEY_LEN)).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("ff"));
    }

    #[test]
    fn converts_to_configuration_error() {
        let err: CryptoError = KeyError::AllZero.into();
        assert!(matches!(err, CryptoError::Configuration(_)));
    }
}
