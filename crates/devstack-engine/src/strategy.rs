//! Install strategy selection
//!
//! The decision between running a native installer, extracting an archive
//! or placing a single file is made here and nowhere else.

use devstack_core::ComponentDescriptor;
use serde::Serialize;
use std::fmt;

/// URL suffixes treated as native installers
const INSTALLER_EXTENSIONS: &[&str] = &[".exe", ".msi"];

/// How a downloaded artifact is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallStrategy {
    /// Execute a self-extracting or native installer
    Installer,

    /// Extract a zip archive, flattening a single wrapper folder
    Archive,

    /// Place the downloaded file as-is
    Direct,
}

impl fmt::Display for InstallStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Installer => "installer",
            Self::Archive => "archive",
            Self::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// Pick the strategy for a resolved download
///
/// Priority order:
/// 1. `run_installer`, or an installer URL when installer arguments exist
/// 2. `is_archive`, or a `.zip` URL
/// 3. direct file
pub fn select_strategy(
    descriptor: &ComponentDescriptor,
    url: &str,
    installer_args: Option<&str>,
) -> InstallStrategy {
    let path = url_path(url);

    let installer_url = INSTALLER_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
    if descriptor.run_installer || (installer_url && installer_args.is_some()) {
        return InstallStrategy::Installer;
    }

    if descriptor.is_archive || path.ends_with(".zip") {
        return InstallStrategy::Archive;
    }

    InstallStrategy::Direct
}

/// Lowercased URL path without query or fragment
fn url_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(name, format!("/tools/{}", name)).unwrap()
    }

    #[test]
    fn test_run_installer_flag_wins_over_archive() {
        let desc = plain("openssl").archive().installer("/VERYSILENT");
        assert_eq!(
            select_strategy(&desc, "https://h/openssl.zip", Some("/VERYSILENT")),
            InstallStrategy::Installer
        );
    }

    #[test]
    fn test_exe_url_needs_installer_args() {
        let desc = plain("git");
        assert_eq!(
            select_strategy(&desc, "https://h/PortableGit.7z.EXE", Some("-y")),
            InstallStrategy::Installer
        );
        assert_eq!(
            select_strategy(&desc, "https://h/PortableGit.7z.exe", None),
            InstallStrategy::Direct
        );
    }

    #[test]
    fn test_zip_url_or_archive_flag_selects_archive() {
        assert_eq!(
            select_strategy(&plain("x"), "http://h/x-1.0.ZIP", None),
            InstallStrategy::Archive
        );
        assert_eq!(
            select_strategy(&plain("pgsql").archive(), "https://h/getfile.jsp?fileid=1", None),
            InstallStrategy::Archive
        );
    }

    #[test]
    fn test_query_string_is_ignored_for_suffix_checks() {
        assert_eq!(
            select_strategy(&plain("x"), "https://h/x.zip?token=abc.exe", Some("/S")),
            InstallStrategy::Archive
        );
    }

    #[test]
    fn test_single_file_falls_back_to_direct() {
        assert_eq!(
            select_strategy(&plain("composer"), "https://h/2.7.0/composer.phar", None),
            InstallStrategy::Direct
        );
    }
}
