//! CSPRNG-backed random bytes and tokens.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

/// Default byte length of [`secure_token`] output.
pub const DEFAULT_TOKEN_LEN: usize = 32;

/// Fill `buf` from the OS CSPRNG.
pub fn fill(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// `len` random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    fill(&mut buf);
    buf
}

/// `len` random bytes, hex-encoded (`2 * len` characters).
pub fn secure_token(len: usize) -> String {
    hex::encode(random_bytes(len))
}
