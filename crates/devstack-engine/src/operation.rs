//! Per-call install state
//!
//! An [`InstallOperation`] lives for one install call. It tracks the state
//! machine position and whether rollback is armed, which happens the moment
//! the target directory is first created.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::strategy::InstallStrategy;

/// Install state machine positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotStarted,
    DirectoryChecked,
    AlreadyInstalled,
    DirectoryCreated,
    Downloaded,
    Materialized,
    Finalized,
    PostInstalled,
    Done,
}

/// Transient state of one install call
#[derive(Debug)]
pub struct InstallOperation {
    component: String,
    version: String,
    target_dir: PathBuf,
    strategy: InstallStrategy,
    state: InstallState,
    rollback_armed: bool,
    download_path: Option<PathBuf>,
    top_level_folder: Option<String>,
    bytes_downloaded: u64,
}

impl InstallOperation {
    pub fn new(
        component: impl Into<String>,
        version: impl Into<String>,
        target_dir: PathBuf,
        strategy: InstallStrategy,
    ) -> Self {
        Self {
            component: component.into(),
            version: version.into(),
            target_dir,
            strategy,
            state: InstallState::NotStarted,
            rollback_armed: false,
            download_path: None,
            top_level_folder: None,
            bytes_downloaded: 0,
        }
    }

    /// Move to the next state
    pub fn advance(&mut self, next: InstallState) {
        debug!(
            "{} {}: {:?} -> {:?}",
            self.component, self.version, self.state, next
        );
        if next == InstallState::DirectoryCreated {
            self.rollback_armed = true;
        }
        self.state = next;
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    /// True once the target directory exists because of this call
    pub fn rollback_armed(&self) -> bool {
        self.rollback_armed
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn strategy(&self) -> InstallStrategy {
        self.strategy
    }

    /// Record where the artifact is being downloaded
    pub fn set_download_path(&mut self, path: PathBuf) {
        self.download_path = Some(path);
    }

    pub fn download_path(&self) -> Option<&Path> {
        self.download_path.as_deref()
    }

    pub fn set_top_level_folder(&mut self, folder: Option<String>) {
        self.top_level_folder = folder;
    }

    pub fn top_level_folder(&self) -> Option<&str> {
        self.top_level_folder.as_deref()
    }

    pub fn record_download(&mut self, bytes: u64) {
        self.bytes_downloaded = bytes;
    }

    pub fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_arms_on_directory_creation() {
        let mut op = InstallOperation::new(
            "php",
            "8.2.0",
            PathBuf::from("/tools/php/php-8.2.0"),
            InstallStrategy::Archive,
        );
        assert_eq!(op.state(), InstallState::NotStarted);
        assert!(!op.rollback_armed());

        op.advance(InstallState::DirectoryChecked);
        assert!(!op.rollback_armed());

        op.advance(InstallState::DirectoryCreated);
        assert!(op.rollback_armed());

        op.advance(InstallState::Downloaded);
        assert!(op.rollback_armed());
        assert_eq!(op.state(), InstallState::Downloaded);
    }
}
