//! Command implementations

pub mod check;
pub mod components;
pub mod install;
pub mod installed;
pub mod latest;
pub mod list;
pub mod uninstall;

use anyhow::{Context as _, Result};
use devstack_core::HierarchicalConfigLoader;
use devstack_engine::{DevStack, NoopPathManager};
use std::sync::Arc;

use crate::cli::Cli;

/// Shared state built once from the global flags
pub struct Context {
    pub stack: DevStack,
    pub quiet: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut loader =
            HierarchicalConfigLoader::new().context("Failed to locate configuration directory")?;
        if let Some(file) = &cli.config {
            loader = loader.with_file(file.clone());
        }

        let mut config = loader
            .load_runtime_config()
            .context("Failed to load runtime configuration")?;
        if let Some(base_dir) = &cli.base_dir {
            config.base_dir = Some(base_dir.clone().into_std_path_buf());
        }

        // PATH edits are left to the user's shell setup
        let stack = DevStack::new(&config, Arc::new(NoopPathManager))
            .context("Failed to initialize DevStack")?
            .with_progress(!cli.quiet);

        Ok(Self {
            stack,
            quiet: cli.quiet,
        })
    }
}
