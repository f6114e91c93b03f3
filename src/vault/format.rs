//! Binary vault file format.
//!
//! A vault file has this layout:
//!
//! ```text
//! [version: 1 byte][salt: 16 bytes][Fernet token: base64url text]
//! ```
//!
//! - **Version**: format version (currently `1`).  Any other value is
//!   rejected; there is no forward compatibility.
//! - **Salt**: the PBKDF2 salt, stored in the clear.
//! - **Token**: the whole secrets map, encrypted and authenticated as
//!   one Fernet token.  Everything after byte 16 is the token text.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::crypto::kdf::SALT_LEN;
use crate::errors::{FernlockError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 1 (version) + 16 (salt).
pub const PREFIX_LEN: usize = 1 + SALT_LEN;

// ---------------------------------------------------------------------------
// VaultFile
// ---------------------------------------------------------------------------

/// The parsed contents of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    /// Format version byte.
    pub version: u8,

    /// The salt used for key derivation.
    pub salt: [u8; SALT_LEN],

    /// Fernet token text (base64url, ASCII).
    pub token: Vec<u8>,
}

impl VaultFile {
    /// Build a current-version file from a salt and token text.
    pub fn new(salt: [u8; SALT_LEN], token: impl Into<Vec<u8>>) -> Self {
        Self {
            version: CURRENT_VERSION,
            salt,
            token: token.into(),
        }
    }

    /// Serialize to the on-disk byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PREFIX_LEN + self.token.len());
        buf.push(self.version);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.token);
        buf
    }

    /// Parse the on-disk byte layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < PREFIX_LEN {
            return Err(FernlockError::InvalidVaultFormat(format!(
                "file is {} bytes, expected at least {PREFIX_LEN}",
                data.len()
            )));
        }

        let version = data[0];
        if version != CURRENT_VERSION {
            return Err(FernlockError::UnsupportedVersion(version));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[1..PREFIX_LEN]);

        Ok(Self {
            version,
            salt,
            token: data[PREFIX_LEN..].to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Disk I/O
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**, owner-only.
///
/// 1. Create the parent directory (mode 0700) if it is missing.
/// 2. Write to a 0600 temp file in the same directory.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_vault(path: &Path, file: &VaultFile) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_private_dir(parent)?;

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = write_private_file(&tmp_path, &file.to_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(path = %path.display(), "vault written");
    Ok(())
}

/// Read and parse a vault file.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    if !path.exists() {
        return Err(FernlockError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    VaultFile::from_bytes(&data)
}

fn write_private_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let mut f = opts.open(path)?;

    // `mode` only applies on creation; a leftover temp file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        f.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    f.write_all(bytes)?;
    f.sync_all()?;
    Ok(())
}

/// Mode bits of `dir` that grant group or other access, if any.
#[cfg(unix)]
fn shared_mode_bits(dir: &Path) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(dir)?.permissions().mode() & 0o777;
    Ok((mode & 0o077 != 0).then_some(mode))
}

fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        // Existing directories are left as they are; just flag loose ones.
        #[cfg(unix)]
        {
            if let Some(mode) = shared_mode_bits(dir)? {
                warn!(
                    dir = %dir.display(),
                    mode = format_args!("{mode:o}"),
                    "vault directory is accessible by other users, consider chmod 700"
                );
            }
        }
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)?;

    debug!(dir = %dir.display(), "created vault directory");
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
