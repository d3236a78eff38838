//! Shared utility functions for DevStack crates

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get the user's home directory
///
/// Prefers the HOME (or USERPROFILE) environment variable over
/// `dirs::home_dir()` so that tests and wrappers can redirect it.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

/// Replace every `{version}` placeholder in a template
pub fn substitute_version(template: &str, version: &str) -> String {
    template.replace("{version}", version)
}

/// Whether a version can name a directory under its tool directory
///
/// Separators, drive prefixes and the `.`/`..` segments would let the version
/// point outside `<tool_dir>/<name>-<version>`.
pub fn is_safe_version(version: &str) -> bool {
    !version.is_empty()
        && version != "."
        && version != ".."
        && !version.contains(['/', '\\', ':', '\0'])
}
