//! Installed versions and uninstallation
//!
//! There is no manifest: a version is installed when its
//! `<tool_dir>/<name>-<version>` directory exists.

use devstack_core::{is_safe_version, ComponentDescriptor, Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::path::PathManager;
use crate::types::UninstallOutcome;

/// Installed versions of a component, sorted by ordinal string order
///
/// A missing tool directory yields an empty list.
pub fn list_installed(descriptor: &ComponentDescriptor) -> Result<Vec<String>> {
    let tool_dir = &descriptor.tool_dir;
    if !tool_dir.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}-", descriptor.name());
    let entries =
        std::fs::read_dir(tool_dir).map_err(|e| Error::file_system("Failed to read", tool_dir, e))?;

    let mut versions: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_prefix(&prefix)
                .filter(|version| !version.is_empty())
                .map(str::to_string)
        })
        .collect();

    versions.sort();
    Ok(versions)
}

/// Removes installed versions and notifies the PATH collaborator
#[derive(Clone)]
pub struct Uninstaller {
    path_manager: Arc<dyn PathManager>,
}

impl Uninstaller {
    pub fn new(path_manager: Arc<dyn PathManager>) -> Self {
        Self { path_manager }
    }

    /// Remove one installed version
    ///
    /// A blank version, or one that would resolve outside the tool
    /// directory, is rejected before the filesystem is touched.
    pub async fn uninstall(
        &self,
        descriptor: &ComponentDescriptor,
        version: &str,
    ) -> Result<UninstallOutcome> {
        let version = version.trim();
        if !is_safe_version(version) {
            return Err(Error::uninstall_argument(descriptor.name()));
        }

        let dir = descriptor.target_dir(version);
        if !dir.is_dir() {
            info!("{} is not installed", descriptor.sub_dir(version));
            return Ok(UninstallOutcome::NotInstalled { dir });
        }

        tokio::fs::remove_dir_all(&dir)
            .await
            .map_err(|e| Error::file_system("Failed to remove", &dir, e))?;
        info!("{} removed", descriptor.sub_dir(version));

        let mut warnings = Vec::new();

        if let Err(e) = self.path_manager.remove_from_path(std::slice::from_ref(&dir)) {
            warn!("Could not remove {} from PATH: {}", dir.display(), e);
            warnings.push(format!("PATH update failed: {}", e));
        }

        let shortcut = match remove_bin_shortcuts(&descriptor.bin_dir(), descriptor.name(), version) {
            Ok(removed) => removed.into_iter().next(),
            Err(e) => {
                warn!("Could not remove shortcut: {}", e);
                warnings.push(format!("shortcut removal failed: {}", e));
                None
            }
        };

        Ok(UninstallOutcome::Removed {
            dir,
            shortcut,
            warnings,
        })
    }
}

/// Delete `<bin_dir>/<name>-<version>` and `<bin_dir>/<name>-<version>.*`
fn remove_bin_shortcuts(bin_dir: &Path, name: &str, version: &str) -> Result<Vec<PathBuf>> {
    if !bin_dir.is_dir() {
        return Ok(Vec::new());
    }

    let stem = format!("{}-{}", name, version);
    let entries =
        std::fs::read_dir(bin_dir).map_err(|e| Error::file_system("Failed to read", bin_dir, e))?;

    let mut removed = Vec::new();
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let matches = file_name == stem
            || file_name
                .strip_prefix(&stem)
                .is_some_and(|rest| rest.starts_with('.') && !rest[1..].contains('.'));
        if !matches {
            continue;
        }

        std::fs::remove_file(&path).map_err(|e| Error::file_system("Failed to remove", &path, e))?;
        debug!("Removed shortcut {}", path.display());
        removed.push(path);
    }

    Ok(removed)
}
