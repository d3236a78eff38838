//! Tool installation and lifecycle engine for DevStack
//!
//! This crate handles:
//! - Version catalogs (embedded, directory overrides, remote with caching)
//! - Browser-like HTTP downloads streamed to disk
//! - Archive, native installer and direct-file installation strategies
//! - Executable finalization and bin shortcuts
//! - Component post-install hooks
//! - Installed version scanning and uninstallation
//!
//! [`DevStack`] is the entry point used by front ends.

pub mod archive;
pub mod catalog;
pub mod components;
pub mod direct;
pub mod fetcher;
pub mod finalize;
pub mod hooks;
pub mod installer;
pub mod inventory;
pub mod manager;
pub mod operation;
pub mod orchestrator;
pub mod path;
pub mod strategy;
pub mod types;

pub use catalog::{CatalogSource, VersionCatalog};
pub use fetcher::{ContentFetcher, FetchResult};
pub use inventory::Uninstaller;
pub use manager::DevStack;
pub use operation::{InstallOperation, InstallState};
pub use orchestrator::InstallOrchestrator;
pub use path::{NoopPathManager, PathManager};
pub use strategy::{select_strategy, InstallStrategy};
pub use types::{InstallOutcome, InstallReport, InstallWarning, UninstallOutcome, UrlCheck};
