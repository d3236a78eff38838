//! DevStack facade
//!
//! [`DevStack`] ties the component table, version catalog, install
//! orchestrator and uninstaller together behind name-based operations.

use devstack_core::{
    is_safe_version, ComponentDescriptor, Error, Result, RuntimeConfig, VersionRecord,
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::VersionCatalog;
use crate::components;
use crate::fetcher::ContentFetcher;
use crate::inventory::{self, Uninstaller};
use crate::orchestrator::InstallOrchestrator;
use crate::path::PathManager;
use crate::types::{InstallOutcome, UninstallOutcome, UrlCheck};

/// Directory under the tools root holding cached remote catalogs
const CATALOG_CACHE_DIR: &str = ".cache/catalogs";

/// Entry point for front ends
pub struct DevStack {
    base_dir: PathBuf,
    components: Vec<ComponentDescriptor>,
    catalog: VersionCatalog,
    orchestrator: InstallOrchestrator,
    uninstaller: Uninstaller,
}

impl DevStack {
    /// Build from runtime configuration with the built-in components
    pub fn new(config: &RuntimeConfig, path_manager: Arc<dyn PathManager>) -> Result<Self> {
        let base_dir = config.tools_dir()?;
        let client = ContentFetcher::build_client(&config.network)?;
        let fetcher = ContentFetcher::with_client(client.clone(), &config.network);
        let catalog = VersionCatalog::from_config(
            &config.catalog,
            base_dir.join(CATALOG_CACHE_DIR),
            client,
        );
        let orchestrator = InstallOrchestrator::new(fetcher, config.install.clone());

        Self::with_parts(base_dir, catalog, orchestrator, path_manager)
    }

    /// Assemble from explicit parts
    pub fn with_parts(
        base_dir: PathBuf,
        catalog: VersionCatalog,
        orchestrator: InstallOrchestrator,
        path_manager: Arc<dyn PathManager>,
    ) -> Result<Self> {
        let components = components::all(&base_dir)?;
        Ok(Self {
            base_dir,
            components,
            catalog,
            orchestrator,
            uninstaller: Uninstaller::new(path_manager),
        })
    }

    /// Show download progress bars during installs
    pub fn with_progress(mut self, show: bool) -> Self {
        self.orchestrator = self.orchestrator.with_progress(show);
        self
    }

    /// Add a component, replacing a built-in one with the same name
    pub fn register(&mut self, descriptor: ComponentDescriptor) {
        match self
            .components
            .iter_mut()
            .find(|existing| existing.name() == descriptor.name())
        {
            Some(existing) => *existing = descriptor,
            None => self.components.push(descriptor),
        }
    }

    /// Register in-memory catalog records for a component
    pub fn register_catalog(&mut self, component: impl Into<String>, records: Vec<VersionRecord>) {
        self.catalog.insert_records(component, records);
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.components
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    pub fn descriptor(&self, name: &str) -> Result<&ComponentDescriptor> {
        self.components
            .iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| Error::unknown_component(name))
    }

    /// Install a version, or the latest one when none is given
    pub async fn install(&self, name: &str, version: Option<&str>) -> Result<InstallOutcome> {
        let descriptor = self.descriptor(name)?;

        let version = match version.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) if !is_safe_version(v) => return Err(Error::invalid_version(name, v)),
            Some(v) => v.to_string(),
            None => self.catalog.latest(name).await?,
        };
        debug!("Resolving {} {}", name, version);

        let record = self.catalog.resolve(name, &version).await?;
        self.orchestrator.install(descriptor, &record).await
    }

    pub async fn uninstall(&self, name: &str, version: &str) -> Result<UninstallOutcome> {
        let descriptor = self.descriptor(name)?;
        self.uninstaller.uninstall(descriptor, version).await
    }

    pub async fn list_available(&self, name: &str) -> Result<Vec<String>> {
        self.descriptor(name)?;
        self.catalog.list_available(name).await
    }

    pub fn list_installed(&self, name: &str) -> Result<Vec<String>> {
        inventory::list_installed(self.descriptor(name)?)
    }

    pub async fn latest_version(&self, name: &str) -> Result<String> {
        self.descriptor(name)?;
        self.catalog.latest(name).await
    }

    /// HEAD every catalog URL of a component without downloading
    pub async fn check_catalog(&self, name: &str) -> Result<Vec<UrlCheck>> {
        self.descriptor(name)?;
        let records = self.catalog.records(name).await?;
        let fetcher = self.orchestrator.fetcher();

        let checks = records.into_iter().map(|record| async move {
            match fetcher.probe(&record.url).await {
                Ok(status) => UrlCheck {
                    version: record.version,
                    url: record.url,
                    status: Some(status),
                    error: None,
                },
                Err(e) => UrlCheck {
                    version: record.version,
                    url: record.url,
                    status: None,
                    error: Some(e.to_string()),
                },
            }
        });

        Ok(join_all(checks).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NoopPathManager;
    use tempfile::TempDir;

    fn devstack(base: &Path) -> DevStack {
        let config = RuntimeConfig {
            base_dir: Some(base.to_path_buf()),
            ..Default::default()
        };
        DevStack::new(&config, Arc::new(NoopPathManager)).unwrap()
    }

    #[test]
    fn test_builtin_components_are_registered() {
        let temp = TempDir::new().unwrap();
        let stack = devstack(temp.path());
        assert_eq!(stack.components().len(), 17);
        assert_eq!(stack.descriptor("go").unwrap().tool_dir, temp.path().join("go"));
        assert!(stack.descriptor("cobol").is_err());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let temp = TempDir::new().unwrap();
        let mut stack = devstack(temp.path());
        let custom = ComponentDescriptor::new("php", temp.path().join("custom-php"))
            .unwrap()
            .with_label("Custom PHP");
        stack.register(custom);

        assert_eq!(stack.components().len(), 17);
        assert_eq!(stack.descriptor("php").unwrap().label, "Custom PHP");
    }

    #[tokio::test]
    async fn test_uninstall_blank_version_is_rejected() {
        let temp = TempDir::new().unwrap();
        let stack = devstack(temp.path());
        let err = stack.uninstall("php", "  ").await.unwrap_err();
        assert!(matches!(err, Error::UninstallArgument { .. }));
        assert!(!temp.path().join("php").exists());
    }

    #[tokio::test]
    async fn test_latest_version_reads_embedded_catalog() {
        let temp = TempDir::new().unwrap();
        let stack = devstack(temp.path());
        let available = stack.list_available("adminer").await.unwrap();
        let latest = stack.latest_version("adminer").await.unwrap();
        assert_eq!(available.last(), Some(&latest));
    }
}
