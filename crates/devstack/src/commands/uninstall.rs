//! Uninstall command

use anyhow::Result;
use devstack_engine::UninstallOutcome;

use super::Context;
use crate::cli::UninstallArgs;
use crate::output;

pub async fn run(args: UninstallArgs, ctx: &Context) -> Result<()> {
    // A missing version is reported by the engine with a usage hint
    let version = args.version.as_deref().unwrap_or("");
    let outcome = ctx.stack.uninstall(&args.component, version).await?;

    match &outcome {
        UninstallOutcome::Removed {
            shortcut, warnings, ..
        } => {
            output::success(&outcome.message());
            if let Some(shortcut) = shortcut {
                if !ctx.quiet {
                    output::detail("Removed shortcut", shortcut.display());
                }
            }
            for warning in warnings {
                output::warning(warning);
            }
        }
        UninstallOutcome::NotInstalled { .. } => output::warning(&outcome.message()),
    }

    Ok(())
}
