//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{FernlockError, Result};
use crate::vault::MIN_PASSWORD_LEN;

/// Environment variable holding the new password for `rotate-key`.
pub const NEW_PASSWORD_ENV: &str = "FERNLOCK_NEW_PASSWORD";

/// fernlock CLI: password-protected local secrets vault.
#[derive(Parser)]
#[command(
    name = "fernlock",
    about = "Password-protected local secrets vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Fernlock home directory (default: ~/.fernlock)
    #[arg(long, global = true, env = "FERNLOCK_HOME")]
    pub home: Option<PathBuf>,

    /// Print machine-readable JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// List secrets (values are never shown)
    List,

    /// Set a secret (add or update)
    Set {
        /// Secret name (e.g. API_KEY)
        name: String,
        /// Secret value (omit to read from stdin or an interactive prompt)
        value: Option<String>,
    },

    /// Generate and store a random secret
    Generate {
        /// Secret name
        name: String,
        /// Number of random bytes (8-256)
        #[arg(short, long)]
        length: Option<usize>,
        /// Output format: urlsafe or hex
        #[arg(short, long)]
        format: Option<String>,
        /// Overwrite an existing secret
        #[arg(long)]
        force: bool,
    },

    /// Check whether a secret exists (exit code 0 = yes, 1 = no)
    Exists {
        /// Secret name
        name: String,
    },

    /// Print a secret's plaintext value
    Reveal {
        /// Secret name
        name: String,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Record that a secret was deployed to a target
    MarkDeployed {
        /// Secret name
        name: String,
        /// Deployment target (e.g. a worker or project name)
        target: String,
    },

    /// Change the vault password (re-salts and re-encrypts the vault)
    RotateKey,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the fernlock home directory and load its settings.
pub fn load_settings(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => Settings::default_home()?,
    };
    let settings = Settings::load(&home)?;
    Ok((home, settings))
}

/// Validate a secret name typed on the command line.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most 256 characters.  The vault itself
/// accepts any name; this only keeps new CLI names shell-friendly.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FernlockError::InvalidSecretName(
            "secret name cannot be empty".into(),
        ));
    }
    if name.len() > 256 {
        return Err(FernlockError::InvalidSecretName(
            "secret name cannot exceed 256 characters".into(),
        ));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(FernlockError::InvalidSecretName(format!(
            "'{name}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}

/// Get the vault password.
///
/// Checks `env_var` first (CI/CD friendly), then prompts interactively.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| FernlockError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `init` and `rotate-key`).
///
/// Also respects `env_var` for scripted/CI usage.
/// Enforces a minimum password length.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            if pw.chars().count() < MIN_PASSWORD_LEN {
                return Err(FernlockError::PasswordTooShort(MIN_PASSWORD_LEN));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| FernlockError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}
