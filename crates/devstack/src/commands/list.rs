//! Available versions command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::ComponentArgs;
use crate::output;

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "INSTALLED")]
    installed: String,
}

pub async fn run(args: ComponentArgs, ctx: &Context) -> Result<()> {
    let spinner = output::spinner(
        !args.json && !ctx.quiet,
        &format!("Loading {} catalog", args.component),
    );
    let available = ctx.stack.list_available(&args.component).await;
    output::finish(spinner);
    let available = available?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&available)?);
        return Ok(());
    }

    if available.is_empty() {
        output::info(&format!("No versions of {} are published", args.component));
        return Ok(());
    }

    let installed = ctx.stack.list_installed(&args.component)?;
    let rows: Vec<VersionRow> = available
        .iter()
        .map(|version| VersionRow {
            version: version.clone(),
            installed: if installed.contains(version) {
                "yes".to_string()
            } else {
                String::new()
            },
        })
        .collect();

    output::header(&format!("Available {} versions", args.component));
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);

    Ok(())
}
