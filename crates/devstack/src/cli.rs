//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// DevStack - install and manage side-by-side versions of development tools
#[derive(Parser, Debug)]
#[command(name = "devstack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a devstack-runtime.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Root directory for installed tools
    #[arg(long, global = true, env = "DEVSTACK_BASE_DIR")]
    pub base_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a component version (latest when omitted)
    Install(InstallArgs),

    /// Remove an installed component version
    Uninstall(UninstallArgs),

    /// List versions available in the catalog
    List(ComponentArgs),

    /// List installed versions
    Installed(ComponentArgs),

    /// Show the latest catalog version
    Latest(LatestArgs),

    /// List supported components
    Components(ComponentsArgs),

    /// Check that every catalog URL of a component is reachable
    Check(ComponentArgs),
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Component name (e.g. php, node, nginx)
    pub component: String,

    /// Version to install
    pub version: Option<String>,

    /// Output the install report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Component name
    pub component: String,

    /// Version to remove
    pub version: Option<String>,
}

#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Component name
    pub component: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Component name
    pub component: String,
}

#[derive(Args, Debug)]
pub struct ComponentsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
