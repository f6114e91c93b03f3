//! The in-memory vault key.
//!
//! A Fernet key is 32 bytes: the first half signs tokens with
//! HMAC-SHA256, the second half encrypts them with AES-128-CBC.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::{derive_key, KEY_LEN};

/// Length of each key half; the token codec splits the key here.
pub const HALF_LEN: usize = KEY_LEN / 2;

/// A 32-byte derived key that zeroes its memory when dropped.
///
/// Exists only while a vault is unlocked; it is never written to disk.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Run PBKDF2 over `password` and `salt` and wrap the result.
    pub fn derive(password: &[u8], salt: &[u8]) -> Self {
        let mut bytes = derive_key(password, salt);
        let key = Self::new(bytes);
        bytes.zeroize();
        key
    }

    /// Access the raw key bytes (e.g. to pass to the token codec).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}
