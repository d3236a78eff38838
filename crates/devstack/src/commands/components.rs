//! Supported components command

use anyhow::Result;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::ComponentsArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct ComponentRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LABEL")]
    label: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "INSTALLED")]
    installed: usize,
}

pub fn run(args: ComponentsArgs, ctx: &Context) -> Result<()> {
    let mut rows = Vec::new();
    for descriptor in ctx.stack.components() {
        let installed = ctx.stack.list_installed(descriptor.name())?.len();
        let kind = if descriptor.run_installer {
            "installer"
        } else if descriptor.is_archive {
            "archive"
        } else {
            "download"
        };
        rows.push(ComponentRow {
            name: descriptor.name().to_string(),
            label: descriptor.label.clone(),
            kind: kind.to_string(),
            installed,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::header("Components");
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    output::detail("Base directory", ctx.stack.base_dir().display());

    Ok(())
}
