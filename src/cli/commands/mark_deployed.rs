//! `fernlock mark-deployed` — record that a secret was pushed to a target.
//!
//! The push itself happens outside fernlock; this only keeps the
//! bookkeeping shown by `list`.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, Cli};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `mark-deployed` command.
pub fn execute(cli: &Cli, name: &str, target: &str) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    let password = prompt_password(&settings.password_env)?;
    let mut store = SecretStore::unlock(&path, &password)?;

    store.record_deployment(name, target)?;

    if cli.json {
        output::json(&json!({ "name": name, "target": target, "recorded": true }));
    } else {
        output::success(&format!("Recorded '{name}' \u{2192} {target}"));
    }

    Ok(())
}
