use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FernlockError, Result};

/// Per-user configuration, loaded from `<home>/config.toml`.
///
/// Every field has a sensible default so fernlock works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the vault inside the fernlock home directory.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Environment variable consulted for the vault password before prompting.
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Default number of random bytes for `generate`.
    #[serde(default = "default_generate_length")]
    pub generate_length: usize,

    /// Default rendering for `generate` ("urlsafe" or "hex").
    #[serde(default = "default_generate_format")]
    pub generate_format: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "secrets.vault".to_string()
}

fn default_password_env() -> String {
    "FERNLOCK_PASSWORD".to_string()
}

fn default_generate_length() -> usize {
    32
}

fn default_generate_format() -> String {
    "urlsafe".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            password_env: default_password_env(),
            generate_length: default_generate_length(),
            generate_format: default_generate_format(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the fernlock home.
    const FILE_NAME: &'static str = "config.toml";

    /// Name of the per-user home directory under `$HOME`.
    const HOME_DIR: &'static str = ".fernlock";

    /// Load settings from `<home>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            FernlockError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// The default fernlock home: `~/.fernlock`.
    pub fn default_home() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(Self::HOME_DIR))
            .ok_or_else(|| FernlockError::ConfigError("could not determine home directory".into()))
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `~/.fernlock/secrets.vault`
    pub fn vault_path(&self, home: &Path) -> PathBuf {
        home.join(&self.vault_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
