//! Fernet authenticated-encryption tokens (AES-128-CBC + HMAC-SHA256).
//!
//! Layout of the raw token before base64url encoding:
//!
//! ```text
//! [0x80: 1][timestamp: 8 BE][IV: 16][ciphertext: n*16][HMAC-SHA256: 32]
//! ```
//!
//! The HMAC covers everything before it and is checked before a single
//! block is decrypted.  Tokens produced here are interchangeable with
//! any other Fernet implementation given the same 32-byte key.

use std::time::Duration;

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::kdf::{fill_random, KEY_LEN};
use super::keys::HALF_LEN;
use crate::errors::{FernlockError, Result, TokenError};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Version byte of every Fernet token.
pub const VERSION: u8 = 0x80;

/// AES block size, also the IV length.
pub const BLOCK_LEN: usize = 16;

const TIMESTAMP_LEN: usize = 8;
const MAC_LEN: usize = 32;

/// Version + timestamp + IV.
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + BLOCK_LEN;

/// Smallest well-formed token: header, one ciphertext block, MAC.
pub const MIN_TOKEN_LEN: usize = HEADER_LEN + BLOCK_LEN + MAC_LEN;

/// Tokens stamped further than this into the future are rejected when
/// an age limit is being enforced.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Encrypt `plaintext` under a 32-byte Fernet key, stamped with the
/// current time.  Returns the base64url token text.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String> {
    encrypt_at_time(key, plaintext, unix_now())
}

/// Like [`encrypt`] with an explicit Unix timestamp.
pub fn encrypt_at_time(key: &[u8; KEY_LEN], plaintext: &[u8], timestamp: u64) -> Result<String> {
    let mut iv = [0u8; BLOCK_LEN];
    fill_random(&mut iv)?;

    let padded = Zeroizing::new(pkcs7_pad(plaintext));
    let raw = seal_padded(key, &padded, &iv, timestamp)?;
    Ok(URL_SAFE.encode(raw))
}

/// Verify and decrypt a token.
///
/// `max_age` of `None` (or zero) disables the timestamp check, which is
/// how vault files are read.
pub fn decrypt(
    key: &[u8; KEY_LEN],
    token: &[u8],
    max_age: Option<Duration>,
) -> std::result::Result<Vec<u8>, TokenError> {
    decrypt_at_time(key, token, max_age, unix_now())
}

/// Like [`decrypt`] with an explicit "current" Unix timestamp.
pub fn decrypt_at_time(
    key: &[u8; KEY_LEN],
    token: &[u8],
    max_age: Option<Duration>,
    now: u64,
) -> std::result::Result<Vec<u8>, TokenError> {
    let data = URL_SAFE.decode(token).map_err(|_| TokenError::BadToken)?;

    if data.len() < MIN_TOKEN_LEN {
        return Err(TokenError::BadToken);
    }
    if data[0] != VERSION {
        return Err(TokenError::BadVersion);
    }

    let (signing_key, encryption_key) = key.split_at(HALF_LEN);
    let (body, tag) = data.split_at(data.len() - MAC_LEN);

    // Nothing below this line runs for an unauthenticated token.
    let mut mac = HmacSha256::new_from_slice(signing_key).map_err(|_| TokenError::BadHmac)?;
    mac.update(body);
    mac.verify_slice(tag).map_err(|_| TokenError::BadHmac)?;

    let mut ts_bytes = [0u8; TIMESTAMP_LEN];
    ts_bytes.copy_from_slice(&body[1..1 + TIMESTAMP_LEN]);
    let timestamp = u64::from_be_bytes(ts_bytes);

    if let Some(ttl) = max_age.filter(|d| !d.is_zero()) {
        if timestamp.saturating_add(ttl.as_secs()) < now {
            return Err(TokenError::TokenExpired);
        }
        if now.saturating_add(MAX_CLOCK_SKEW_SECS) < timestamp {
            return Err(TokenError::TokenExpired);
        }
    }

    let iv = &body[1 + TIMESTAMP_LEN..HEADER_LEN];
    let ciphertext = &body[HEADER_LEN..];
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(TokenError::BadToken);
    }

    let padded = Zeroizing::new(
        Aes128CbcDec::new_from_slices(encryption_key, iv)
            .map_err(|_| TokenError::BadToken)?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| TokenError::BadToken)?,
    );

    pkcs7_unpad(&padded).map(<[u8]>::to_vec)
}

/// PKCS7-pad `data` to a multiple of 16 bytes.
///
/// Padding is always at least one byte; block-aligned input gains a
/// whole block of `0x10`.
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strip PKCS7 padding, rejecting anything that is not well-formed.
pub fn pkcs7_unpad(data: &[u8]) -> std::result::Result<&[u8], TokenError> {
    let Some(&last) = data.last() else {
        return Err(TokenError::BadPadding);
    };
    let pad = usize::from(last);
    if pad == 0 || pad > BLOCK_LEN || pad > data.len() {
        return Err(TokenError::BadPadding);
    }

    let (content, padding) = data.split_at(data.len() - pad);
    if padding.iter().any(|&b| b != last) {
        return Err(TokenError::BadPadding);
    }
    Ok(content)
}

/// Build the raw (not yet base64-encoded) token for already padded input.
fn seal_padded(
    key: &[u8; KEY_LEN],
    padded: &[u8],
    iv: &[u8; BLOCK_LEN],
    timestamp: u64,
) -> Result<Vec<u8>> {
    let (signing_key, encryption_key) = key.split_at(HALF_LEN);

    let ciphertext = Aes128CbcEnc::new_from_slices(encryption_key, iv)
        .map_err(|e| FernlockError::EncryptionFailed(format!("invalid key length: {e}")))?
        .encrypt_padded_vec_mut::<NoPadding>(padded);

    let mut raw = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
    raw.push(VERSION);
    raw.extend_from_slice(&timestamp.to_be_bytes());
    raw.extend_from_slice(iv);
    raw.extend_from_slice(&ciphertext);

    let mut mac = HmacSha256::new_from_slice(signing_key)
        .map_err(|e| FernlockError::EncryptionFailed(format!("invalid HMAC key: {e}")))?;
    mac.update(&raw);
    raw.extend_from_slice(&mac.finalize().into_bytes());

    Ok(raw)
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
