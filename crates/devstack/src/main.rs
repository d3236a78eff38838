//! DevStack CLI - install and manage local development tools
//!
//! This is the main entry point for the devstack command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let ctx = commands::Context::from_cli(&cli)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(args, &ctx).await,
        Commands::Uninstall(args) => commands::uninstall::run(args, &ctx).await,
        Commands::List(args) => commands::list::run(args, &ctx).await,
        Commands::Installed(args) => commands::installed::run(args, &ctx),
        Commands::Latest(args) => commands::latest::run(args, &ctx).await,
        Commands::Components(args) => commands::components::run(args, &ctx),
        Commands::Check(args) => commands::check::run(args, &ctx).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Engine progress is logged at info; -v adds state transitions
            0 => EnvFilter::new("warn,devstack_engine=info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
