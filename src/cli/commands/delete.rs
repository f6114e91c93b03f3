//! `fernlock delete` — remove a secret from the vault.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, Cli};
use crate::errors::{FernlockError, Result};
use crate::vault::SecretStore;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    // Ask for confirmation only when someone is there to answer.
    if !force && !cli.json && io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| FernlockError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let password = prompt_password(&settings.password_env)?;
    let mut store = SecretStore::unlock(&path, &password)?;

    store.delete(name)?;

    if cli.json {
        output::json(&json!({ "name": name, "deleted": true }));
    } else {
        output::success(&format!("Deleted secret '{name}'"));
    }

    Ok(())
}
