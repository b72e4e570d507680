//! Structured logging for processes that host the encryption service.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the host's call.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, key material, password or tag** appears in any log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`) and can be
//!   overridden with `RUST_LOG`.

pub mod init;

pub use init::init;
