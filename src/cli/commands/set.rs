//! `fernlock set` — add or update a secret in the vault.

use std::io::{self, IsTerminal, Read};

use serde_json::json;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, validate_secret_name, Cli};
use crate::errors::{FernlockError, Result};
use crate::vault::SecretStore;

/// Execute the `set` command.
pub fn execute(cli: &Cli, name: &str, value: Option<&str>) -> Result<()> {
    validate_secret_name(name)?;

    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    // Determine the secret value from one of three sources.
    let secret_value = Zeroizing::new(if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        v.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter value for {name}"))
            .interact()
            .map_err(|e| FernlockError::CommandFailed(format!("input prompt: {e}")))?
    });

    if secret_value.is_empty() {
        return Err(FernlockError::CommandFailed(
            "secret value must not be empty".into(),
        ));
    }

    let password = prompt_password(&settings.password_env)?;
    let mut store = SecretStore::unlock_or_create(&path, &password)?;

    let existed = store.exists(name);
    store.set(name, &secret_value)?;

    if cli.json {
        output::json(&json!({ "name": name, "set": true, "updated": existed }));
        return Ok(());
    }

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Secret '{name}' {verb} ({} total)",
        store.count()
    ));

    Ok(())
}
