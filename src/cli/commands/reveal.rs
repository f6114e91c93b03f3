//! `fernlock reveal` — print a single secret's plaintext value.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, Cli};
use crate::errors::{FernlockError, Result};
use crate::vault::SecretStore;

/// Execute the `reveal` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    let password = prompt_password(&settings.password_env)?;
    let store = SecretStore::unlock(&path, &password)?;

    let value = store
        .get(name)
        .ok_or_else(|| FernlockError::SecretNotFound(name.to_string()))?;

    if cli.json {
        output::json(&json!({ "name": name, "value": value }));
    } else {
        println!("{value}");
    }

    Ok(())
}
