//! `fernlock generate` — create a random secret and store it.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::json;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, validate_secret_name, Cli};
use crate::crypto::random_bytes;
use crate::errors::{FernlockError, Result};
use crate::vault::SecretStore;

/// Allowed range for the number of random bytes.
const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 256;

/// How the random bytes are rendered into the stored string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// base64url with `=` padding.
    UrlSafe,
    /// Lowercase hex.
    Hex,
}

impl Encoding {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "urlsafe" => Ok(Self::UrlSafe),
            "hex" => Ok(Self::Hex),
            other => Err(FernlockError::CommandFailed(format!(
                "unsupported format: {other} (use 'urlsafe' or 'hex')"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrlSafe => "urlsafe",
            Self::Hex => "hex",
        }
    }

    pub fn render(self, raw: &[u8]) -> String {
        match self {
            Self::UrlSafe => URL_SAFE.encode(raw),
            Self::Hex => hex::encode(raw),
        }
    }
}

/// Execute the `generate` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    length: Option<usize>,
    format: Option<&str>,
    force: bool,
) -> Result<()> {
    validate_secret_name(name)?;

    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    let length = length.unwrap_or(settings.generate_length);
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(FernlockError::CommandFailed(format!(
            "length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}"
        )));
    }
    let encoding = Encoding::parse(format.unwrap_or(settings.generate_format.as_str()))?;

    let password = prompt_password(&settings.password_env)?;
    let mut store = SecretStore::unlock_or_create(&path, &password)?;

    if store.exists(name) && !force {
        return Err(FernlockError::CommandFailed(format!(
            "secret '{name}' already exists (use --force to overwrite)"
        )));
    }

    let raw = Zeroizing::new(random_bytes(length)?);
    let value = Zeroizing::new(encoding.render(&raw));
    store.set(name, &value)?;

    if cli.json {
        output::json(&json!({
            "name": name,
            "generated": true,
            "length": length,
            "format": encoding.as_str(),
        }));
    } else {
        output::success(&format!(
            "Secret '{name}' generated ({length} bytes, {})",
            encoding.as_str()
        ));
    }

    Ok(())
}
