//! Cryptographic primitives for fernlock.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` holder and its signing/encryption split (`keys`)
//! - Fernet token encryption and verification (`token`)

pub mod kdf;
pub mod keys;
pub mod token;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use kdf::{derive_key, generate_salt, random_bytes};
pub use keys::DerivedKey;
pub use token::{decrypt, encrypt};
