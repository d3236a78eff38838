//! Catalog URL check command

use anyhow::{bail, Result};
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::ComponentArgs;
use crate::output;

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "URL")]
    url: String,
}

pub async fn run(args: ComponentArgs, ctx: &Context) -> Result<()> {
    let spinner = output::spinner(
        !args.json && !ctx.quiet,
        &format!("Checking {} download URLs", args.component),
    );
    let checks = ctx.stack.check_catalog(&args.component).await;
    output::finish(spinner);
    let checks = checks?;
    let broken = checks.iter().filter(|c| !c.is_reachable()).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        let rows: Vec<CheckRow> = checks
            .iter()
            .map(|check| CheckRow {
                version: check.version.clone(),
                status: match (check.status, &check.error) {
                    (Some(code), _) => code.to_string(),
                    (None, Some(error)) => error.clone(),
                    (None, None) => "unknown".to_string(),
                },
                url: check.url.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);

        if broken == 0 {
            output::success(&format!("All {} URLs are reachable", checks.len()));
        }
    }

    if broken > 0 {
        output::error(&format!("{} of {} URLs are unreachable", broken, checks.len()));
        bail!("catalog check failed for {}", args.component);
    }

    Ok(())
}
