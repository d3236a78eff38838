//! Executable finalization
//!
//! After materialization the main executable may be renamed to a
//! version-qualified name and copied into the shared `<tool_dir>/bin`
//! directory, so several versions can sit side by side on PATH.
//! Both steps are best effort; failures surface as warnings.

use devstack_core::utils::substitute_version;
use devstack_core::{ComponentDescriptor, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::types::InstallWarning;

/// What finalization produced for one install
#[derive(Debug, Default)]
pub struct Finalization {
    pub executable: Option<PathBuf>,
    pub shortcut: Option<PathBuf>,
    pub warnings: Vec<InstallWarning>,
}

/// Rename and shortcut the main executable according to the descriptor
pub fn finalize(descriptor: &ComponentDescriptor, version: &str, target_dir: &Path) -> Finalization {
    let mut result = Finalization::default();

    let Some(relative) = descriptor.executable_relative_path(version) else {
        return result;
    };

    let mut exe = target_dir.join(&relative);

    if descriptor.rename_exe_after_install {
        let (dir, file) = split_relative(target_dir, &relative);
        match rename_main_executable(&dir, &file, version, descriptor.name()) {
            Ok(Some(renamed)) => exe = renamed,
            Ok(None) => debug!("{} not present, skipping rename", exe.display()),
            Err(e) => {
                warn!("Failed to rename {}: {}", exe.display(), e);
                result.warnings.push(InstallWarning::Finalization {
                    message: e.to_string(),
                });
            }
        }
    }

    if descriptor.create_bin_shortcut {
        match create_bin_shortcut(&descriptor.tool_dir, &exe, descriptor.name(), version) {
            Ok(Some(shortcut)) => result.shortcut = Some(shortcut),
            Ok(None) => {
                let message = format!("{} not found, no shortcut created", exe.display());
                warn!("{}", message);
                result.warnings.push(InstallWarning::Finalization { message });
            }
            Err(e) => {
                warn!("Failed to create shortcut for {}: {}", exe.display(), e);
                result.warnings.push(InstallWarning::Finalization {
                    message: e.to_string(),
                });
            }
        }
    }

    if exe.is_file() {
        result.executable = Some(exe);
    }
    result
}

/// Rename `<dir>/<pattern>` to `<prefix>-<version>.<ext>`
///
/// `{version}` in the pattern is substituted first. The source extension is
/// kept. Returns `None` when the file does not exist.
pub fn rename_main_executable(
    dir: &Path,
    relative_pattern: &str,
    version: &str,
    prefix: &str,
) -> Result<Option<PathBuf>> {
    let source = dir.join(substitute_version(relative_pattern, version));
    if !source.is_file() {
        return Ok(None);
    }

    let parent = source.parent().unwrap_or(dir);
    let renamed = parent.join(versioned_file_name(prefix, version, &source));
    if renamed == source {
        return Ok(Some(renamed));
    }

    fs::rename(&source, &renamed).map_err(|e| Error::file_system("Failed to rename", &source, e))?;
    info!(
        "Renamed {} to {}",
        source.display(),
        renamed.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(Some(renamed))
}

/// Copy the finalized executable to `<tool_dir>/bin/<prefix>-<version>.<ext>`
///
/// Returns `None` when the executable does not exist. An existing shortcut
/// is overwritten.
pub fn create_bin_shortcut(
    tool_dir: &Path,
    final_exe: &Path,
    prefix: &str,
    version: &str,
) -> Result<Option<PathBuf>> {
    if !final_exe.is_file() {
        return Ok(None);
    }

    let bin_dir = tool_dir.join("bin");
    fs::create_dir_all(&bin_dir).map_err(|e| Error::file_system("Failed to create", &bin_dir, e))?;

    let shortcut = bin_dir.join(versioned_file_name(prefix, version, final_exe));
    fs::copy(final_exe, &shortcut).map_err(|e| Error::file_system("Failed to copy", final_exe, e))?;

    info!("Shortcut {} created", shortcut.display());
    Ok(Some(shortcut))
}

/// `<prefix>-<version>` plus the extension of `source`, if any
pub fn versioned_file_name(prefix: &str, version: &str, source: &Path) -> String {
    match source.extension() {
        Some(ext) => format!("{}-{}.{}", prefix, version, ext.to_string_lossy()),
        None => format!("{}-{}", prefix, version),
    }
}

fn split_relative(target_dir: &Path, relative: &Path) -> (PathBuf, String) {
    let file = relative
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = match relative.parent() {
        Some(parent) => target_dir.join(parent),
        None => target_dir.to_path_buf(),
    };
    (dir, file)
}
