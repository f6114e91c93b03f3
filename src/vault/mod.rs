//! Vault module — encrypted secret storage.
//!
//! This module provides:
//! - `SecretEntry` and `SecretMetadata` types (`secret`)
//! - The binary vault file container and its disk I/O (`format`)
//! - High-level `SecretStore` for creating, unlocking, and managing vaults (`store`)

pub mod format;
pub mod secret;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultFile;
pub use secret::{SecretEntry, SecretMetadata};
pub use store::{SecretStore, MIN_PASSWORD_LEN};
