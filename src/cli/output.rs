//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::collections::HashMap;

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::SecretMetadata;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a JSON value on a single line (for `--json`).
pub fn json(value: &serde_json::Value) {
    println!("{value}");
}

/// Print a table of secret metadata (Name, Created, Updated, Deployed to),
/// sorted by name.
pub fn print_secrets_table(secrets: &HashMap<String, SecretMetadata>) {
    if secrets.is_empty() {
        info("No secrets in this vault yet.");
        tip("Run `fernlock set <NAME>` to add your first secret.");
        return;
    }

    let mut names: Vec<&String> = secrets.keys().collect();
    names.sort();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Created", "Updated", "Deployed to"]);

    for name in names {
        let meta = &secrets[name];
        let mut targets: Vec<&str> = meta.deployed_to.keys().map(String::as_str).collect();
        targets.sort_unstable();

        table.add_row(vec![
            name.clone(),
            meta.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            meta.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            targets.join(", "),
        ]);
    }

    println!("{table}");
}
