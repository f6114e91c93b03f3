//! High-level vault operations used by CLI commands.
//!
//! `SecretStore` wraps the file format layer and the crypto layer so
//! that the rest of the application can work with simple method calls
//! like `store.set("API_KEY", "sk-...")`.  One handle is one unlocked
//! session; dropping it wipes the key and every decrypted value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::kdf::{generate_salt, SALT_LEN};
use crate::crypto::keys::DerivedKey;
use crate::crypto::token;
use crate::errors::{FernlockError, Result};

use super::format::{self, VaultFile};
use super::secret::{SecretEntry, SecretMetadata};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// The main vault handle.  Create one with `SecretStore::create` or
/// `SecretStore::unlock`, then use its methods to manage secrets.
///
/// Every mutator re-encrypts the whole map and overwrites the file
/// before returning.  If that write fails the in-memory change is
/// undone, so the map always mirrors the last successful write.
pub struct SecretStore {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Salt stored in the file header.
    salt: [u8; SALT_LEN],

    /// Key derived from the password and salt (zeroized on drop).
    key: DerivedKey,

    /// In-memory map of secret name -> entry.
    secrets: HashMap<String, SecretEntry>,
}

impl SecretStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new, empty vault file at `path`.
    ///
    /// Generates a random salt, derives the key from the password and
    /// writes the empty vault to disk immediately.  An existing file is
    /// never overwritten: that case returns
    /// [`FernlockError::VaultAlreadyExists`].
    pub fn create(path: &Path, password: &str) -> Result<Self> {
        check_password(password)?;

        if path.exists() {
            return Err(FernlockError::VaultAlreadyExists(path.to_path_buf()));
        }

        let salt = generate_salt()?;
        let key = DerivedKey::derive(password.as_bytes(), &salt);

        let store = Self {
            path: path.to_path_buf(),
            salt,
            key,
            secrets: HashMap::new(),
        };
        store.save()?;

        debug!(path = %path.display(), "vault created");
        Ok(store)
    }

    /// Open an existing vault file.
    ///
    /// Every format, token or payload failure is reported as
    /// [`FernlockError::UnlockFailed`]; the precise cause only goes to
    /// the debug log.  A missing file and plain I/O errors are passed
    /// through unchanged.
    pub fn unlock(path: &Path, password: &str) -> Result<Self> {
        let file = match format::read_vault(path) {
            Ok(file) => file,
            Err(e @ (FernlockError::VaultNotFound(_) | FernlockError::Io(_))) => return Err(e),
            Err(e) => {
                debug!(error = %e, "vault header rejected");
                return Err(FernlockError::UnlockFailed);
            }
        };

        let key = DerivedKey::derive(password.as_bytes(), &file.salt);

        let secrets = open_payload(&key, &file.token).map_err(|e| {
            debug!(error = %e, "vault payload rejected");
            FernlockError::UnlockFailed
        })?;

        debug!(path = %path.display(), secrets = secrets.len(), "vault unlocked");
        Ok(Self {
            path: path.to_path_buf(),
            salt: file.salt,
            key,
            secrets,
        })
    }

    /// Unlock the vault at `path`, creating it first if no file exists.
    pub fn unlock_or_create(path: &Path, password: &str) -> Result<Self> {
        if path.exists() {
            Self::unlock(path, password)
        } else {
            Self::create(path, password)
        }
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Return the plaintext value of a secret, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.secrets.get(name).map(|entry| entry.value.as_str())
    }

    /// Add or update a secret and persist.
    ///
    /// Any string is a valid name here, so vaults written by other tools
    /// stay editable.  Updating keeps the original `created_at` and
    /// deployment records.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let now = Utc::now();
        let previous = self.secrets.get(name).cloned();

        match self.secrets.get_mut(name) {
            Some(entry) => {
                entry.value.zeroize();
                entry.value = value.to_string();
                entry.updated_at = now;
            }
            None => {
                self.secrets
                    .insert(name.to_string(), SecretEntry::new(value, now));
            }
        }

        self.persist_or_restore(name, previous)
    }

    /// Remove a secret and persist.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let Some(removed) = self.secrets.remove(name) else {
            return Err(FernlockError::SecretNotFound(name.to_string()));
        };

        self.persist_or_restore(name, Some(removed))
    }

    /// Returns `true` if the vault contains a secret with the given name.
    pub fn exists(&self, name: &str) -> bool {
        self.secrets.contains_key(name)
    }

    /// Metadata for every secret, keyed by name.  Values are never included.
    pub fn list(&self) -> HashMap<String, SecretMetadata> {
        self.secrets
            .iter()
            .map(|(name, entry)| (name.clone(), entry.metadata()))
            .collect()
    }

    /// Record that `name` was deployed to `target` just now, and persist.
    pub fn record_deployment(&mut self, name: &str, target: &str) -> Result<()> {
        let Some(entry) = self.secrets.get_mut(name) else {
            return Err(FernlockError::SecretNotFound(name.to_string()));
        };

        let previous = entry.clone();
        entry.deployed_to.insert(target.to_string(), Utc::now());

        self.persist_or_restore(name, Some(previous))
    }

    /// Returns the number of secrets in the vault.
    pub fn count(&self) -> usize {
        self.secrets.len()
    }

    /// Secret names in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.secrets.keys().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Password rotation
    // ------------------------------------------------------------------

    /// Re-key the vault under a new password.
    ///
    /// A fresh salt and key replace the old pair and the file is
    /// rewritten atomically.  If the write fails the old pair stays in
    /// effect and the file on disk is untouched.
    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        check_password(new_password)?;

        let salt = generate_salt()?;
        let key = DerivedKey::derive(new_password.as_bytes(), &salt);

        let old_salt = std::mem::replace(&mut self.salt, salt);
        let old_key = std::mem::replace(&mut self.key, key);

        if let Err(e) = self.save() {
            warn!(error = %e, "password change not written, keeping previous key");
            self.salt = old_salt;
            self.key = old_key;
            return Err(e);
        }

        debug!(path = %self.path.display(), "vault re-keyed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt the whole map into a fresh token and overwrite the file.
    fn save(&self) -> Result<()> {
        let payload = Zeroizing::new(
            serde_json::to_vec(&self.secrets)
                .map_err(|e| FernlockError::SerializationError(format!("secrets: {e}")))?,
        );

        let token = token::encrypt(self.key.as_bytes(), &payload)?;
        format::write_vault(&self.path, &VaultFile::new(self.salt, token))
    }

    /// Persist, or put `name` back to `previous` if the write fails.
    fn persist_or_restore(&mut self, name: &str, previous: Option<SecretEntry>) -> Result<()> {
        if let Err(e) = self.save() {
            warn!(secret = name, error = %e, "vault write failed, change rolled back");
            match previous {
                Some(entry) => {
                    self.secrets.insert(name.to_string(), entry);
                }
                None => {
                    self.secrets.remove(name);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("path", &self.path)
            .field("secrets", &self.secrets.len())
            .finish_non_exhaustive()
    }
}

/// Decrypt a token and parse the secrets map inside it.
fn open_payload(key: &DerivedKey, token_text: &[u8]) -> Result<HashMap<String, SecretEntry>> {
    let plaintext = Zeroizing::new(token::decrypt(key.as_bytes(), token_text, None)?);

    serde_json::from_slice(&plaintext)
        .map_err(|e| FernlockError::SerializationError(format!("vault payload: {e}")))
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FernlockError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_counts_characters() {
        assert!(check_password("short").is_err());
        assert!(check_password("1234567").is_err());
        assert!(check_password("12345678").is_ok());
        // Eight characters, more than eight bytes.
        assert!(check_password("pässwörd").is_ok());
    }

    #[test]
    fn payload_with_wrong_key_is_rejected() {
        let key = DerivedKey::new([1u8; 32]);
        let other = DerivedKey::new([2u8; 32]);
        let token = token::encrypt(key.as_bytes(), b"{}").unwrap();

        assert!(open_payload(&key, token.as_bytes()).unwrap().is_empty());
        assert!(matches!(
            open_payload(&other, token.as_bytes()),
            Err(FernlockError::Token(crate::errors::TokenError::BadHmac))
        ));
    }

    #[test]
    fn authenticated_non_json_payload_is_rejected() {
        let key = DerivedKey::new([1u8; 32]);
        let token = token::encrypt(key.as_bytes(), b"not json").unwrap();
        assert!(matches!(
            open_payload(&key, token.as_bytes()),
            Err(FernlockError::SerializationError(_))
        ));
    }
}
