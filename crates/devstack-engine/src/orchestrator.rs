//! Install orchestration
//!
//! Drives one install through the state machine:
//!
//! ```text
//! NotStarted -> DirectoryChecked -> [AlreadyInstalled]
//!            -> DirectoryCreated -> Downloaded -> Materialized
//!            -> Finalized -> PostInstalled -> Done
//! ```
//!
//! Any failure once the target directory has been created removes it again
//! before the error is returned. Finalization and hook failures are
//! warnings and never trigger rollback.

use devstack_core::types::InstallConfig;
use devstack_core::{is_safe_version, ComponentDescriptor, Error, Result, VersionRecord};
use tracing::{debug, info, warn};
use url::Url;

use crate::archive;
use crate::direct;
use crate::fetcher::ContentFetcher;
use crate::finalize;
use crate::hooks::{self, HookContext};
use crate::installer;
use crate::operation::{InstallOperation, InstallState};
use crate::strategy::{select_strategy, InstallStrategy};
use crate::types::{InstallOutcome, InstallReport, InstallWarning};

/// Runs installs for resolved version records
#[derive(Clone)]
pub struct InstallOrchestrator {
    fetcher: ContentFetcher,
    settings: InstallConfig,
}

impl InstallOrchestrator {
    pub fn new(fetcher: ContentFetcher, settings: InstallConfig) -> Self {
        Self { fetcher, settings }
    }

    /// Show download progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.fetcher = self.fetcher.with_progress(show);
        self
    }

    pub fn fetcher(&self) -> &ContentFetcher {
        &self.fetcher
    }

    /// Install one version of a component
    ///
    /// Returns [`InstallOutcome::AlreadyInstalled`] without touching the
    /// network when the version directory already exists.
    pub async fn install(
        &self,
        descriptor: &ComponentDescriptor,
        record: &VersionRecord,
    ) -> Result<InstallOutcome> {
        let name = descriptor.name();
        let version = record.version.as_str();
        if !is_safe_version(version) {
            return Err(Error::invalid_version(name, version));
        }
        let target_dir = descriptor.target_dir(version);
        let installer_args = descriptor.render_installer_args(version, &target_dir);
        let strategy = select_strategy(descriptor, &record.url, installer_args.as_deref());

        let mut op = InstallOperation::new(name, version, target_dir.clone(), strategy);

        if target_dir.exists() {
            op.advance(InstallState::AlreadyInstalled);
            info!("{} {} is already installed", name, version);
            return Ok(InstallOutcome::AlreadyInstalled {
                component: name.to_string(),
                version: version.to_string(),
                target_dir,
            });
        }
        op.advance(InstallState::DirectoryChecked);

        Url::parse(&record.url)
            .map_err(|e| Error::download(&record.url, format!("Invalid URL: {}", e)))?;

        std::fs::create_dir_all(&descriptor.tool_dir)
            .map_err(|e| Error::file_system("Failed to create", &descriptor.tool_dir, e))?;

        info!("Installing {} {} ({})", name, version, strategy);

        let mut warnings = match self
            .run_armed(descriptor, &mut op, &record.url, installer_args.as_deref())
            .await
        {
            Ok(warnings) => warnings,
            Err(e) => {
                self.rollback(&op).await;
                return Err(Error::install(name, version, e));
            }
        };

        let finalized = finalize::finalize(descriptor, version, &target_dir);
        warnings.extend(finalized.warnings);
        op.advance(InstallState::Finalized);

        let ctx = HookContext {
            descriptor,
            version,
            target_dir: &target_dir,
        };
        match hooks::run(descriptor.post_install, &ctx) {
            Ok(notes) => {
                for note in notes {
                    debug!("{} {}: {}", name, version, note);
                }
            }
            Err(e) => {
                warn!("Post-install step for {} {} failed: {}", name, version, e);
                warnings.push(InstallWarning::PostInstall {
                    message: e.to_string(),
                });
            }
        }
        op.advance(InstallState::PostInstalled);
        op.advance(InstallState::Done);

        info!("{} {} installed in {}", name, version, target_dir.display());

        Ok(InstallOutcome::Installed(InstallReport {
            component: name.to_string(),
            version: version.to_string(),
            target_dir,
            strategy,
            top_level_folder: op.top_level_folder().map(str::to_string),
            executable: finalized.executable,
            shortcut: finalized.shortcut,
            bytes_downloaded: op.bytes_downloaded(),
            warnings,
        }))
    }

    /// Create the target directory and materialize the download
    ///
    /// Everything in here runs with rollback armed once the directory exists.
    async fn run_armed(
        &self,
        descriptor: &ComponentDescriptor,
        op: &mut InstallOperation,
        url: &str,
        installer_args: Option<&str>,
    ) -> Result<Vec<InstallWarning>> {
        let target_dir = op.target_dir().to_path_buf();
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| Error::file_system("Failed to create", &target_dir, e))?;
        op.advance(InstallState::DirectoryCreated);

        let name = descriptor.name();
        let version = op.version().to_string();

        match op.strategy() {
            InstallStrategy::Archive => {
                let zip_path = archive::temp_archive_path(&descriptor.tool_dir, name, &version);
                archive::install(&self.fetcher, &self.settings, op, url, &zip_path).await
            }
            InstallStrategy::Installer => {
                let file_name = direct::download_file_name(url, name, &version);
                installer::install(
                    &self.fetcher,
                    op,
                    url,
                    &descriptor.tool_dir,
                    &file_name,
                    installer_args,
                )
                .await
            }
            InstallStrategy::Direct => {
                let file_name = direct::download_file_name(url, name, &version);
                direct::install(&self.fetcher, op, url, &file_name).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Undo a failed install; secondary failures are only logged
    async fn rollback(&self, op: &InstallOperation) {
        if !op.rollback_armed() {
            return;
        }

        let target_dir = op.target_dir();
        warn!(
            "Rolling back {} {}: removing {}",
            op.component(),
            op.version(),
            target_dir.display()
        );

        if let Err(e) = tokio::fs::remove_dir_all(target_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Rollback could not remove {}: {}", target_dir.display(), e);
            }
        }

        if let Some(artifact) = op.download_path() {
            if !artifact.starts_with(target_dir) {
                if let Err(e) = tokio::fs::remove_file(artifact).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!("Rollback could not remove {}: {}", artifact.display(), e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devstack_core::types::NetworkConfig;
    use tempfile::TempDir;

    fn orchestrator() -> InstallOrchestrator {
        let network = NetworkConfig {
            preflight: false,
            ..Default::default()
        };
        InstallOrchestrator::new(ContentFetcher::new(&network).unwrap(), InstallConfig::default())
    }

    #[tokio::test]
    async fn test_existing_directory_short_circuits() {
        let temp = TempDir::new().unwrap();
        let desc = ComponentDescriptor::new("x", temp.path().join("x")).unwrap().archive();
        std::fs::create_dir_all(desc.target_dir("1.0")).unwrap();

        // The URL is unreachable; it must never be requested
        let record = VersionRecord::new("1.0", "http://127.0.0.1:1/x-1.0.zip");
        let outcome = orchestrator().install(&desc, &record).await.unwrap();

        assert!(outcome.is_already_installed());
        assert_eq!(outcome.target_dir(), &desc.target_dir("1.0"));
    }

    #[tokio::test]
    async fn test_catalog_version_escaping_tool_dir_is_rejected() {
        let temp = TempDir::new().unwrap();
        let desc = ComponentDescriptor::new("x", temp.path().join("x")).unwrap().archive();
        let record = VersionRecord::new("1.0/../../outside", "http://127.0.0.1:1/x.zip");

        let err = orchestrator().install(&desc, &record).await.unwrap_err();

        assert!(matches!(err, Error::InvalidVersion { .. }));
        assert!(!temp.path().join("x").exists());
        assert!(!temp.path().join("outside").exists());
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_directory_creation() {
        let temp = TempDir::new().unwrap();
        let desc = ComponentDescriptor::new("x", temp.path().join("x")).unwrap();
        let record = VersionRecord::new("1.0", "not a url");

        let err = orchestrator().install(&desc, &record).await.unwrap_err();

        assert!(err.is_download());
        assert!(!matches!(err, Error::Install { .. }));
        assert!(!desc.target_dir("1.0").exists());
    }

    #[tokio::test]
    async fn test_transport_failure_rolls_back() {
        let temp = TempDir::new().unwrap();
        let desc = ComponentDescriptor::new("x", temp.path().join("x")).unwrap().archive();
        let record = VersionRecord::new("1.0", "http://127.0.0.1:1/x-1.0.zip");

        let err = orchestrator().install(&desc, &record).await.unwrap_err();

        assert!(matches!(err, Error::Install { .. }));
        assert!(err.is_download());
        assert!(!desc.target_dir("1.0").exists());
        assert!(!archive::temp_archive_path(&desc.tool_dir, "x", "1.0").exists());
    }
}
