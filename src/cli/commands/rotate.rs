//! `fernlock rotate-key` — change the vault password.
//!
//! Unlocks with the current password, then re-derives the key from the
//! new password under a fresh salt and rewrites the vault atomically.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, prompt_password, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    // 1. Unlock with the current password.
    if !cli.json {
        output::info("Enter your current vault password.");
    }
    let old_password = prompt_password(&settings.password_env)?;
    let mut store = SecretStore::unlock(&path, &old_password)?;

    // 2. Prompt for the new password.
    if !cli.json {
        output::info("Choose your new vault password.");
    }
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. New salt, new key, whole file rewritten.
    store.change_password(&new_password)?;

    if cli.json {
        output::json(&json!({ "rotated": true, "secrets": store.count() }));
    } else {
        output::success(&format!(
            "Password rotated ({} secrets re-encrypted)",
            store.count()
        ));
    }

    Ok(())
}
