//! `fernlock exists` — report whether a secret is present.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, Cli};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `exists` command.
///
/// Returns whether the secret exists; the caller turns `false` into a
/// non-zero exit code.
pub fn execute(cli: &Cli, name: &str) -> Result<bool> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    let password = prompt_password(&settings.password_env)?;
    let store = SecretStore::unlock(&path, &password)?;

    let exists = store.exists(name);

    if cli.json {
        output::json(&json!({ "name": name, "exists": exists }));
    } else if exists {
        output::success(&format!("Secret '{name}' exists"));
    } else {
        output::info(&format!("Secret '{name}' not found"));
    }

    Ok(exists)
}
