//! Extensions command

use anyhow::{Context, Result};
use cmdfacts_extensions::ExtensionRegistry;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ExtensionsArgs;

#[derive(Tabled, Serialize)]
struct ExtensionRow {
    name: String,
    requires: String,
    description: String,
}

/// List the built-in extensions and what each requires
pub fn run(args: ExtensionsArgs) -> Result<()> {
    let registry = ExtensionRegistry::with_builtins();

    let rows: Vec<ExtensionRow> = registry
        .descriptors()
        .map(|d| ExtensionRow {
            name: d.name.clone(),
            requires: if d.requires.is_empty() {
                "-".to_string()
            } else {
                d.requires.join(", ")
            },
            description: d.description.clone(),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize extensions")?;
        println!("{}", json);
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
