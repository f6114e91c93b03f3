//! SecretEntry and SecretMetadata types stored inside a vault.
//!
//! The decrypted vault payload is a JSON object mapping each secret
//! name to a `SecretEntry`.  Timestamps are RFC 3339 UTC strings so the
//! payload stays readable by other tools holding the same key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A single secret as stored in the vault payload.
///
/// The plaintext value is wiped from memory when the entry is dropped.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretEntry {
    /// The plaintext secret value.
    pub value: String,

    /// When this secret was first created.
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    /// When this secret's value was last changed.
    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,

    /// Deployment target name -> time of the last deployment there.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    #[zeroize(skip)]
    pub deployed_to: HashMap<String, DateTime<Utc>>,
}

impl SecretEntry {
    /// A fresh entry with both timestamps set to `now`.
    pub fn new(value: &str, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            created_at: now,
            updated_at: now,
            deployed_to: HashMap::new(),
        }
    }

    /// Everything about this entry except its value.
    pub fn metadata(&self) -> SecretMetadata {
        SecretMetadata {
            created_at: self.created_at,
            updated_at: self.updated_at,
            deployed_to: self.deployed_to.clone(),
        }
    }
}

impl std::fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEntry")
            .field("value", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deployed_to", &self.deployed_to)
            .finish()
    }
}

/// Lightweight metadata about a secret (no value).
///
/// Returned by `SecretStore::list` so callers can display secret names,
/// timestamps and deployments without touching any plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deployed_to: HashMap<String, DateTime<Utc>>,
}
