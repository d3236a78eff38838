//! Result types returned by engine operations

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::strategy::InstallStrategy;

/// Non-fatal condition encountered during an install
///
/// Warnings never fail the install; they are collected in the report so
/// callers can show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InstallWarning {
    /// Executable rename or bin shortcut failed
    Finalization { message: String },

    /// Component hook failed after the install succeeded
    PostInstall { message: String },

    /// A temporary artifact could not be removed
    Cleanup { path: PathBuf, message: String },

    /// Native installer exited with a non-zero status
    InstallerExit { code: Option<i32> },
}

impl fmt::Display for InstallWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finalization { message } => write!(f, "finalization: {}", message),
            Self::PostInstall { message } => write!(f, "post-install: {}", message),
            Self::Cleanup { path, message } => {
                write!(f, "could not remove {}: {}", path.display(), message)
            }
            Self::InstallerExit { code: Some(code) } => {
                write!(f, "installer exited with status {}", code)
            }
            Self::InstallerExit { code: None } => write!(f, "installer terminated by signal"),
        }
    }
}

/// Details of a completed install
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallReport {
    pub component: String,
    pub version: String,
    pub target_dir: PathBuf,
    pub strategy: InstallStrategy,

    /// Wrapper folder removed by flattening, archive installs only
    pub top_level_folder: Option<String>,

    /// Finalized main executable, when the component has one
    pub executable: Option<PathBuf>,

    /// Copy placed in the shared bin directory
    pub shortcut: Option<PathBuf>,

    pub bytes_downloaded: u64,
    pub warnings: Vec<InstallWarning>,
}

/// Outcome of `install`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum InstallOutcome {
    /// Target directory already present, nothing was done
    AlreadyInstalled {
        component: String,
        version: String,
        target_dir: PathBuf,
    },

    Installed(InstallReport),
}

impl InstallOutcome {
    pub fn version(&self) -> &str {
        match self {
            Self::AlreadyInstalled { version, .. } => version,
            Self::Installed(report) => &report.version,
        }
    }

    pub fn target_dir(&self) -> &PathBuf {
        match self {
            Self::AlreadyInstalled { target_dir, .. } => target_dir,
            Self::Installed(report) => &report.target_dir,
        }
    }

    pub fn warnings(&self) -> &[InstallWarning] {
        match self {
            Self::AlreadyInstalled { .. } => &[],
            Self::Installed(report) => &report.warnings,
        }
    }

    pub fn is_already_installed(&self) -> bool {
        matches!(self, Self::AlreadyInstalled { .. })
    }
}

/// Outcome of `uninstall`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum UninstallOutcome {
    Removed {
        dir: PathBuf,
        shortcut: Option<PathBuf>,
        warnings: Vec<String>,
    },

    NotInstalled { dir: PathBuf },
}

impl UninstallOutcome {
    /// Human readable summary naming the version directory
    pub fn message(&self) -> String {
        match self {
            Self::Removed { dir, .. } => format!("{} removed", dir_name(dir)),
            Self::NotInstalled { dir } => format!("{} is not installed", dir_name(dir)),
        }
    }
}

fn dir_name(dir: &std::path::Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Reachability of one catalog URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UrlCheck {
    pub version: String,
    pub url: String,
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl UrlCheck {
    pub fn is_reachable(&self) -> bool {
        matches!(self.status, Some(code) if (200..400).contains(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninstall_messages_name_the_directory() {
        let removed = UninstallOutcome::Removed {
            dir: PathBuf::from("/tools/php/php-8.2.0"),
            shortcut: None,
            warnings: vec![],
        };
        assert_eq!(removed.message(), "php-8.2.0 removed");

        let missing = UninstallOutcome::NotInstalled {
            dir: PathBuf::from("/tools/php/php-9.9.9"),
        };
        assert_eq!(missing.message(), "php-9.9.9 is not installed");
    }

    #[test]
    fn test_url_check_reachability() {
        let ok = UrlCheck {
            version: "1.0".into(),
            url: "http://h/a".into(),
            status: Some(302),
            error: None,
        };
        let missing = UrlCheck {
            status: Some(404),
            ..ok.clone()
        };
        let failed = UrlCheck {
            status: None,
            error: Some("connection refused".into()),
            ..ok.clone()
        };
        assert!(ok.is_reachable());
        assert!(!missing.is_reachable());
        assert!(!failed.is_reachable());
    }
}
