use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of the Fernet token codec.
///
/// These stay internal to the vault: `SecretStore::unlock` folds every
/// one of them into [`FernlockError::UnlockFailed`] before it reaches a
/// caller, so the exact cause is only visible in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    BadToken,

    #[error("unsupported token version")]
    BadVersion,

    #[error("token signature mismatch")]
    BadHmac,

    #[error("invalid token padding")]
    BadPadding,

    #[error("token has expired")]
    TokenExpired,
}

/// All errors that can occur in fernlock.
#[derive(Debug, Error)]
pub enum FernlockError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Secure random number generator unavailable: {0}")]
    RandomUnavailable(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Unlock failed — wrong password or corrupted vault")]
    UnlockFailed,

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Unsupported vault format version {0}")]
    UnsupportedVersion(u8),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Invalid secret name: {0}")]
    InvalidSecretName(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for fernlock results.
pub type Result<T> = std::result::Result<T, FernlockError>;
