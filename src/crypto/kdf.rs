//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed rather than configurable: vault files
//! carry no KDF parameters, so every implementation that opens them has
//! to agree on the same constant.  Derivation is deliberately slow and
//! should stay off any latency-sensitive path.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;

use crate::errors::{FernlockError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (signing half + encryption half).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Derive a 32-byte key from a password and salt.
///
/// The same password + salt will always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    derive_key_with_rounds(password, salt, PBKDF2_ROUNDS)
}

fn derive_key_with_rounds(password: &[u8], salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut key);
    key
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;
    Ok(salt)
}

/// Return `len` bytes from the operating system's secure RNG.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf)?;
    Ok(buf)
}

pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| FernlockError::RandomUnavailable(e.to_string()))
}
