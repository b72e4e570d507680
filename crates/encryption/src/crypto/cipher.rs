//! AEAD sealing and opening with detached authentication tags.
//!
//! **Algorithm choice:** [`Algorithm::Aes256Gcm`] uses a 16-byte IV so that
//! payloads stay interchangeable with stored `aes-256-gcm` records.
//! [`Algorithm::Aes256GcmSiv`] (RFC 8452) is the nonce-misuse-resistant option.
//!
//! A fresh IV is drawn from the OS CSPRNG for every seal. **Never seal twice
//! with the same IV under one key.** GCM nonce reuse breaks both
//! confidentiality and authentication.

use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm,
};
use aes_gcm_siv::Aes256GcmSiv;
use common::Algorithm;
use thiserror::Error;
use zeroize::Zeroize;

use super::{random, SecretKey};

/// AES-256-GCM with a 128-bit IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key was rejected by the primitive.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// The IV does not match the algorithm's fixed length.
    #[error("iv must be {expected} bytes, got {got}")]
    InvalidIvLength { expected: usize, got: usize },

    /// The tag does not match the algorithm's fixed length.
    #[error("authTag must be {expected} bytes, got {got}")]
    InvalidTagLength { expected: usize, got: usize },

    /// Encryption failed, or decryption failed authentication.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Raw output of [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (unreachable
/// with a valid key and IV).
pub fn seal(algorithm: Algorithm, key: &SecretKey, plaintext: &[u8]) -> Result<Sealed, CipherError> {
    let iv = random::random_bytes(algorithm.iv_len());
    seal_with_iv(algorithm, key, iv, plaintext)
}

/// [`seal`] with a caller-chosen IV. Only for known-answer checks.
pub(crate) fn seal_with_iv(
    algorithm: Algorithm,
    key: &SecretKey,
    iv: Vec<u8>,
    plaintext: &[u8],
) -> Result<Sealed, CipherError> {
    if iv.len() != algorithm.iv_len() {
        return Err(CipherError::InvalidIvLength {
            expected: algorithm.iv_len(),
            got: iv.len(),
        });
    }
    let mut buf = plaintext.to_vec();

    let tag = match algorithm {
        Algorithm::Aes256Gcm => seal_with(&build_cipher::<Aes256Gcm16>(key)?, &iv, &mut buf),
        Algorithm::Aes256GcmSiv => seal_with(&build_cipher::<Aes256GcmSiv>(key)?, &iv, &mut buf),
    };
    let tag = match tag {
        Ok(tag) => tag,
        Err(e) => {
            buf.zeroize();
            return Err(e);
        }
    };

    Ok(Sealed {
        iv,
        ciphertext: buf,
        tag,
    })
}

/// Decrypt and authenticate `ciphertext`.
///
/// IV and tag lengths are checked before the primitive runs. On
/// authentication failure the working buffer is zeroed and no plaintext is
/// returned.
///
/// # Errors
///
/// Returns [`CipherError::InvalidIvLength`] / [`CipherError::InvalidTagLength`]
/// for malformed input, and [`CipherError::AeadFailure`] if authentication
/// fails (wrong key or tampered data).
pub fn open(
    algorithm: Algorithm,
    key: &SecretKey,
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CipherError> {
    if iv.len() != algorithm.iv_len() {
        return Err(CipherError::InvalidIvLength {
            expected: algorithm.iv_len(),
            got: iv.len(),
        });
    }
    if tag.len() != algorithm.tag_len() {
        return Err(CipherError::InvalidTagLength {
            expected: algorithm.tag_len(),
            got: tag.len(),
        });
    }

    let mut buf = ciphertext.to_vec();
    let result = match algorithm {
        Algorithm::Aes256Gcm => open_with(&build_cipher::<Aes256Gcm16>(key)?, iv, &mut buf, tag),
        Algorithm::Aes256GcmSiv => {
            open_with(&build_cipher::<Aes256GcmSiv>(key)?, iv, &mut buf, tag)
        }
    };
    match result {
        Ok(()) => Ok(buf),
        Err(e) => {
            buf.zeroize();
            Err(e)
        }
    }
}

fn build_cipher<C: KeyInit>(key: &SecretKey) -> Result<C, CipherError> {
    C::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}

fn seal_with<C: AeadInPlace>(cipher: &C, iv: &[u8], buf: &mut [u8]) -> Result<Vec<u8>, CipherError> {
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(iv), b"", buf)
        .map_err(|_| CipherError::AeadFailure)?;
    Ok(tag.to_vec())
}

fn open_with<C: AeadInPlace>(
    cipher: &C,
    iv: &[u8],
    buf: &mut [u8],
    tag: &[u8],
) -> Result<(), CipherError> {
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            buf,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| CipherError::AeadFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALGORITHMS: [Algorithm; 2] = [Algorithm::Aes256Gcm, Algorithm::Aes256GcmSiv];

    #[test]
    fn seal_open_round_trip() {
        let key = SecretKey::generate();
        for algorithm in ALGORITHMS {
            let sealed = seal(algorithm, &key, b"123-45-6789").unwrap();
            assert_eq!(sealed.iv.len(), algorithm.iv_len());
            assert_eq!(sealed.tag.len(), algorithm.tag_len());
            assert_eq!(sealed.ciphertext.len(), b"123-45-6789".len());
            let opened = open(algorithm, &key, &sealed.iv, &sealed.ciphertext, &sealed.tag).unwrap();
            assert_eq!(opened, b"123-45-6789");
        }
    }

    #[test]
    fn wrong_key_fails() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();
        for algorithm in ALGORITHMS {
            let sealed = seal(algorithm, &key1, b"secret").unwrap();
            let result = open(algorithm, &key2, &sealed.iv, &sealed.ciphertext, &sealed.tag);
            assert!(matches!(result, Err(CipherError::AeadFailure)));
        }
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let key = SecretKey::generate();
        let mut sealed = seal(Algorithm::Aes256Gcm, &key, b"tamper me").unwrap();
        sealed.tag[0] ^= 0x01;
        assert!(open(Algorithm::Aes256Gcm, &key, &sealed.iv, &sealed.ciphertext, &sealed.tag).is_err());
    }

    #[test]
    fn iv_length_checked_before_primitive() {
        let key = SecretKey::generate();
        let sealed = seal(Algorithm::Aes256Gcm, &key, b"x").unwrap();
        let result = open(Algorithm::Aes256Gcm, &key, &sealed.iv[..12], &sealed.ciphertext, &sealed.tag);
        assert!(matches!(
            result,
            Err(CipherError::InvalidIvLength { expected: 16, got: 12 })
        ));
    }

    #[test]
    fn tag_length_checked_before_primitive() {
        let key = SecretKey::generate();
        let sealed = seal(Algorithm::Aes256GcmSiv, &key, b"x").unwrap();
        let result = open(Algorithm::Aes256GcmSiv, &key, &sealed.iv, &sealed.ciphertext, &sealed.tag[..8]);
        assert!(matches!(
            result,
            Err(CipherError::InvalidTagLength { expected: 16, got: 8 })
        ));
    }

    #[test]
    fn matches_aes_256_gcm_known_answer() {
        // Reference vector for aes-256-gcm with a 16-byte IV and empty AAD.
        let key = SecretKey::from_hex(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        )
        .unwrap();
        let iv = hex::decode("00112233445566778899aabbccddeeff").unwrap();

        let sealed = seal_with_iv(Algorithm::Aes256Gcm, &key, iv.clone(), b"hello world").unwrap();
        assert_eq!(hex::encode(&sealed.ciphertext), "73e288193517ccc650c9cf");
        assert_eq!(hex::encode(&sealed.tag), "34cd1f89a3a67b811171617aa44b597f");

        let opened = open(Algorithm::Aes256Gcm, &key, &iv, &sealed.ciphertext, &sealed.tag).unwrap();
        assert_eq!(opened, b"hello world");
    }

    #[test]
    fn seal_with_iv_rejects_wrong_length() {
        let key = SecretKey::generate();
        assert!(matches!(
            seal_with_iv(Algorithm::Aes256Gcm, &key, vec![0u8; 12], b"x"),
            Err(CipherError::InvalidIvLength { expected: 16, got: 12 })
        ));
    }

    #[test]
    fn fresh_iv_per_seal() {
        let key = SecretKey::generate();
        let a = seal(Algorithm::Aes256Gcm, &key, b"same").unwrap();
        let b = seal(Algorithm::Aes256Gcm, &key, b"same").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn algorithms_not_interchangeable() {
        let key = SecretKey::generate();
        let sealed = seal(Algorithm::Aes256GcmSiv, &key, b"hello").unwrap();
        // 12-byte nonce fails the GCM length check
        assert!(open(Algorithm::Aes256Gcm, &key, &sealed.iv, &sealed.ciphertext, &sealed.tag).is_err());
    }
}
