//! Latest version command

use anyhow::Result;

use super::Context;
use crate::cli::LatestArgs;

pub async fn run(args: LatestArgs, ctx: &Context) -> Result<()> {
    let latest = ctx.stack.latest_version(&args.component).await?;
    println!("{}", latest);
    Ok(())
}
