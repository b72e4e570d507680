//! SHA-256 digests and HMAC-SHA256 signatures, hex-encoded.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Unkeyed SHA-256 digest of `data`. For fingerprinting, never for passwords.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// HMAC-SHA256 of `data` under `key`.
pub fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    let mut mac = keyed(key);
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Recompute the HMAC of `data` and compare it against `signature_hex`.
///
/// The comparison goes through [`Mac::verify_slice`], which runs in constant
/// time. A signature that is not valid hex, or has the wrong length, is
/// rejected.
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = keyed(key);
    mac.update(data);
    mac.verify_slice(&signature).is_ok()
}

/// HMAC keys of any length are valid: long keys are hashed, short ones padded.
fn keyed(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}
