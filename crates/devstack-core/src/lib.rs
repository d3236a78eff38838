//! # devstack-core
//!
//! Core library for the DevStack tool engine providing:
//! - The error taxonomy shared by the engine and the CLI
//! - Runtime configuration (embedded defaults, user file, env overrides)
//! - Component descriptor and version record types

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::{ComponentDescriptor, PostInstallHook, RuntimeConfig, VersionRecord};
pub use utils::{get_home_dir, is_safe_version};
