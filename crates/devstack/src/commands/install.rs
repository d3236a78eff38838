//! Install command

use anyhow::Result;
use devstack_engine::InstallOutcome;

use super::Context;
use crate::cli::InstallArgs;
use crate::output;

pub async fn run(args: InstallArgs, ctx: &Context) -> Result<()> {
    if !args.json && !ctx.quiet {
        let what = args.version.as_deref().unwrap_or("latest");
        output::info(&format!("Installing {} {}", args.component, what));
    }

    let outcome = ctx
        .stack
        .install(&args.component, args.version.as_deref())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        InstallOutcome::AlreadyInstalled { target_dir, .. } => {
            output::info(&format!(
                "{} {} is already installed at {}",
                args.component,
                outcome.version(),
                target_dir.display()
            ));
        }
        InstallOutcome::Installed(report) => {
            output::success(&format!(
                "Installed {} {}",
                report.component, report.version
            ));
            if !ctx.quiet {
                output::detail("Directory", report.target_dir.display());
                output::detail("Strategy", report.strategy);
                if let Some(exe) = &report.executable {
                    output::detail("Executable", exe.display());
                }
                if let Some(shortcut) = &report.shortcut {
                    output::detail("Shortcut", shortcut.display());
                }
            }
        }
    }

    output::install_warnings(outcome.warnings());

    Ok(())
}
