//! `fernlock init` — create a new, empty vault.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, Cli};
use crate::errors::{FernlockError, Result};
use crate::vault::SecretStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    // Refuse before prompting so the user doesn't type a password for nothing.
    if path.exists() {
        output::tip("Use `fernlock set <NAME>` to add secrets to the existing vault.");
        return Err(FernlockError::VaultAlreadyExists(path));
    }

    let password = prompt_new_password(&settings.password_env)?;
    let store = SecretStore::create(&path, &password)?;

    if cli.json {
        output::json(&json!({
            "created": true,
            "path": path.display().to_string(),
            "secrets": store.count(),
        }));
        return Ok(());
    }

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `fernlock set <NAME>` to add a secret.");
    output::tip("Run `fernlock list` to see all secrets.");

    Ok(())
}
