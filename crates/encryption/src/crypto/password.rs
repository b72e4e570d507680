//! bcrypt password hashing, run on the blocking thread pool.
//!
//! bcrypt is deliberately slow; both operations hop onto
//! [`tokio::task::spawn_blocking`] so async callers are not stalled.

use common::CryptoError;
use tracing::{debug, warn};

/// Default work factor.
pub const DEFAULT_COST: u32 = 12;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Reject a work factor outside `MIN_COST..=MAX_COST`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] when `cost` is out of range.
pub fn check_cost(cost: u32) -> Result<(), CryptoError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(CryptoError::InvalidInput(format!(
            "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
        )));
    }
    Ok(())
}

/// Hash `password` with a random salt at the given work factor.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] for an out-of-range cost and
/// [`CryptoError::PasswordHashing`] if bcrypt or the worker task fails.
pub async fn hash(password: &str, cost: u32) -> Result<String, CryptoError> {
    check_cost(cost)?;
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| CryptoError::PasswordHashing(format!("hashing task failed: {e}")))?
        .map_err(|e| CryptoError::PasswordHashing(e.to_string()))
}

/// Check `password` against a stored bcrypt hash.
///
/// Any failure, including a malformed hash, is reported as `false`.
pub async fn verify(password: &str, hash: &str) -> bool {
    let password = password.to_owned();
    let hash = hash.to_owned();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(matched)) => matched,
        Ok(Err(e)) => {
            debug!(error = %e, "stored password hash could not be parsed");
            false
        }
        Err(e) => {
            warn!(error = %e, "password verification task failed");
            false
        }
    }
}
