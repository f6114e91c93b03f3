//! `fernlock list` — display secret names and metadata, never values.

use serde_json::json;

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, Cli};
use crate::errors::Result;
use crate::vault::SecretStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (home, settings) = load_settings(cli)?;
    let path = settings.vault_path(&home);

    let password = prompt_password(&settings.password_env)?;
    let store = SecretStore::unlock(&path, &password)?;

    let secrets = store.list();

    if cli.json {
        let mut names: Vec<&String> = secrets.keys().collect();
        names.sort();

        let items: Vec<_> = names
            .into_iter()
            .map(|name| {
                let meta = &secrets[name];
                let mut item = json!({
                    "name": name,
                    "created_at": meta.created_at,
                    "updated_at": meta.updated_at,
                });
                if !meta.deployed_to.is_empty() {
                    item["deployed_to"] = json!(meta.deployed_to);
                }
                item
            })
            .collect();

        output::json(&json!({ "count": items.len(), "secrets": items }));
        return Ok(());
    }

    output::info(&format!("{} secret(s) in {}", secrets.len(), path.display()));
    output::print_secrets_table(&secrets);

    Ok(())
}
