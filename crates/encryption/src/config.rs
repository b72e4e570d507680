//! Configuration loading and validation for the encryption service.
//!
//! All values are read from environment variables once at process start and
//! passed explicitly to [`crate::EncryptionService::new`]. A missing or
//! malformed key is fatal: the service refuses to construct.

use std::fmt;

use common::{Algorithm, CryptoError};
use serde::Deserialize;

use crate::crypto::{password, SecretKey};

/// Encryption service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// 64 hex characters (32 bytes). **Required.**
    #[serde(default)]
    pub encryption_key: String,

    /// AEAD construction identifier.
    #[serde(default = "default_algorithm")]
    pub encryption_algorithm: String,

    /// bcrypt work factor used by `hash_password`.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_algorithm() -> String {
    Algorithm::default().as_str().into()
}
fn default_bcrypt_cost() -> u32 {
    password::DEFAULT_COST
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Configuration with the given hex key and defaults for everything else.
    pub fn new(encryption_key: impl Into<String>) -> Self {
        Self {
            encryption_key: encryption_key.into(),
            encryption_algorithm: default_algorithm(),
            bcrypt_cost: default_bcrypt_cost(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if `ENCRYPTION_KEY` is absent or
    /// malformed, or if any other variable cannot be parsed.
    pub fn from_env() -> Result<Self, CryptoError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .map_err(|e| {
                CryptoError::Configuration(format!(
                    "failed to build configuration from environment: {e}"
                ))
            })?;

        let c: Config = cfg.try_deserialize().map_err(|e| {
            CryptoError::Configuration(format!("failed to deserialise configuration: {e}"))
        })?;

        c.validate()?;
        Ok(c)
    }

    /// Parsed [`Algorithm`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] for an unknown identifier.
    pub fn algorithm(&self) -> Result<Algorithm, CryptoError> {
        self.encryption_algorithm.parse()
    }

    /// bcrypt work factor, checked against the range bcrypt accepts.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] when the cost is out of range.
    pub fn checked_bcrypt_cost(&self) -> Result<u32, CryptoError> {
        password::check_cost(self.bcrypt_cost).map_err(|_| {
            CryptoError::Configuration(format!(
                "BCRYPT_COST must be between {} and {}",
                password::MIN_COST,
                password::MAX_COST
            ))
        })?;
        Ok(self.bcrypt_cost)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    pub fn validate(&self) -> Result<(), CryptoError> {
        SecretKey::from_hex(&self.encryption_key)?;
        self.algorithm()?;
        self.checked_bcrypt_cost()?;
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("encryption_algorithm", &self.encryption_algorithm)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_algorithm(), "aes-256-gcm");
        assert_eq!(default_bcrypt_cost(), 12);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(Config::new(KEY).validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_key() {
        let err = Config::new("").validate().unwrap_err();
        assert!(matches!(err, CryptoError::Configuration(_)));
        assert!(err.to_string().contains("ENCRYPTION_KEY"));
    }

    #[test]
    fn validate_rejects_unknown_algorithm() {
        let mut cfg = Config::new(KEY);
        cfg.encryption_algorithm = "aes-128-cbc".into();
        assert!(matches!(
            cfg.validate(),
            Err(CryptoError::Configuration(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_cost() {
        let mut cfg = Config::new(KEY);
        cfg.bcrypt_cost = 3;
        assert!(cfg.validate().is_err());
        cfg.bcrypt_cost = 32;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", Config::new(KEY));
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(KEY));
    }
}
