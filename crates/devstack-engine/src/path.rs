//! PATH collaborator
//!
//! The engine never edits the user's PATH itself. Front ends that manage
//! PATH entries implement [`PathManager`] and are told when version
//! directories disappear.

use devstack_core::Result;
use std::path::PathBuf;
use tracing::debug;

/// Receives PATH maintenance requests from the engine
pub trait PathManager: Send + Sync {
    /// Remove the given directories from PATH
    fn remove_from_path(&self, dirs: &[PathBuf]) -> Result<()>;
}

/// PATH manager that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPathManager;

impl PathManager for NoopPathManager {
    fn remove_from_path(&self, dirs: &[PathBuf]) -> Result<()> {
        for dir in dirs {
            debug!("PATH removal requested for {}", dir.display());
        }
        Ok(())
    }
}
