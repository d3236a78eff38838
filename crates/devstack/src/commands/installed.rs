//! Installed versions command

use anyhow::Result;

use super::Context;
use crate::cli::ComponentArgs;
use crate::output;

pub fn run(args: ComponentArgs, ctx: &Context) -> Result<()> {
    let installed = ctx.stack.list_installed(&args.component)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&installed)?);
        return Ok(());
    }

    if installed.is_empty() {
        output::info(&format!("No versions of {} are installed", args.component));
        return Ok(());
    }

    output::header(&format!("Installed {} versions", args.component));
    for version in &installed {
        println!("  {}", version);
    }

    Ok(())
}
