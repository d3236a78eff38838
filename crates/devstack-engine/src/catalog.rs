//! Version catalog reader
//!
//! Handles loading per-component version lists from:
//! 1. Records registered in memory (custom components, tests)
//! 2. An override directory holding `<name>.json` files
//! 3. A remote base URL (with caching under the tools root)
//! 4. Catalogs embedded in the binary
//!
//! The first source that knows a component wins. Catalog files are a JSON
//! array of version records, oldest first; the last entry is the latest.

use devstack_core::types::CatalogConfig;
use devstack_core::{Error, Result, VersionRecord};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Catalog files shipped with the binary
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/catalogs/"]
#[prefix = ""]
struct EmbeddedCatalogs;

/// Where catalog files are looked up
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Catalogs compiled into the binary
    Embedded,

    /// `<dir>/<name>.json`
    Directory(PathBuf),

    /// `<base_url>/<name>.json`, cached in `cache_dir` for `ttl`
    Remote {
        base_url: String,
        cache_dir: PathBuf,
        ttl: Duration,
        client: reqwest::Client,
    },
}

/// Resolves versions and download URLs per component
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    sources: Vec<CatalogSource>,
    records: HashMap<String, Vec<VersionRecord>>,
}

impl VersionCatalog {
    /// Catalog with no sources; only registered records resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog backed by the embedded files only
    pub fn embedded() -> Self {
        Self::new().with_source(CatalogSource::Embedded)
    }

    /// Build the source chain from configuration
    ///
    /// The override directory comes first, then the remote URL, then the
    /// embedded catalogs.
    pub fn from_config(config: &CatalogConfig, cache_dir: PathBuf, client: reqwest::Client) -> Self {
        let mut catalog = Self::new();

        if let Some(dir) = &config.dir {
            catalog = catalog.with_source(CatalogSource::Directory(dir.clone()));
        }

        if let Some(url) = &config.url {
            catalog = catalog.with_source(CatalogSource::Remote {
                base_url: url.trim_end_matches('/').to_string(),
                cache_dir,
                ttl: Duration::from_secs(config.cache_ttl_secs),
                client,
            });
        }

        catalog.with_source(CatalogSource::Embedded)
    }

    /// Append a lower-priority source
    pub fn with_source(mut self, source: CatalogSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Register records for a component, taking priority over every source
    pub fn with_records(mut self, component: impl Into<String>, records: Vec<VersionRecord>) -> Self {
        self.insert_records(component, records);
        self
    }

    pub fn insert_records(&mut self, component: impl Into<String>, records: Vec<VersionRecord>) {
        self.records.insert(component.into(), records);
    }

    pub fn sources(&self) -> &[CatalogSource] {
        &self.sources
    }

    /// All records for a component in catalog order
    pub async fn records(&self, component: &str) -> Result<Vec<VersionRecord>> {
        if let Some(records) = self.records.get(component) {
            return Ok(records.clone());
        }

        for source in &self.sources {
            if let Some(content) = self.load(source, component).await? {
                let records: Vec<VersionRecord> = serde_json::from_str(&content)
                    .map_err(|e| Error::catalog(component, format!("invalid catalog: {}", e)))?;
                debug!("Loaded {} {} versions", records.len(), component);
                return Ok(records);
            }
        }

        Err(Error::catalog(component, "no catalog found"))
    }

    /// Published versions, oldest first
    pub async fn list_available(&self, component: &str) -> Result<Vec<String>> {
        let records = self.non_empty_records(component).await?;
        Ok(records.into_iter().map(|r| r.version).collect())
    }

    /// Record for an exact version
    pub async fn resolve(&self, component: &str, version: &str) -> Result<VersionRecord> {
        self.non_empty_records(component)
            .await?
            .into_iter()
            .find(|r| r.version == version)
            .ok_or_else(|| Error::version_not_found(component, version))
    }

    /// Download URL for an exact version
    pub async fn resolve_url(&self, component: &str, version: &str) -> Result<String> {
        Ok(self.resolve(component, version).await?.url)
    }

    /// Last version in the catalog
    pub async fn latest(&self, component: &str) -> Result<String> {
        self.non_empty_records(component)
            .await?
            .pop()
            .map(|r| r.version)
            .ok_or_else(|| Error::catalog(component, "no versions published"))
    }

    async fn non_empty_records(&self, component: &str) -> Result<Vec<VersionRecord>> {
        let records = self.records(component).await?;
        if records.is_empty() {
            return Err(Error::catalog(component, "no versions published"));
        }
        Ok(records)
    }

    async fn load(&self, source: &CatalogSource, component: &str) -> Result<Option<String>> {
        let file_name = format!("{}.json", component);

        match source {
            CatalogSource::Embedded => Ok(EmbeddedCatalogs::get(&file_name)
                .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())),

            CatalogSource::Directory(dir) => {
                let path = dir.join(&file_name);
                if !path.is_file() {
                    debug!("No catalog override at {}", path.display());
                    return Ok(None);
                }
                std::fs::read_to_string(&path)
                    .map(Some)
                    .map_err(|e| Error::file_system("Failed to read", &path, e))
            }

            CatalogSource::Remote {
                base_url,
                cache_dir,
                ttl,
                client,
            } => {
                let url = format!("{}/{}", base_url, file_name);
                let cache_file = cache_dir.join(&file_name);
                Ok(load_remote(client, &url, &cache_file, *ttl).await)
            }
        }
    }
}

/// Fetch a remote catalog, preferring a fresh cache and falling back to an
/// expired one. `None` lets the next source answer.
async fn load_remote(
    client: &reqwest::Client,
    url: &str,
    cache_file: &Path,
    ttl: Duration,
) -> Option<String> {
    if is_cache_valid(cache_file, ttl) {
        if let Ok(content) = std::fs::read_to_string(cache_file) {
            debug!("Using cached catalog {}", cache_file.display());
            return Some(content);
        }
    }

    match fetch_text(client, url).await {
        Ok(content) => {
            if let Some(parent) = cache_file.parent() {
                if let Err(e) = std::fs::create_dir_all(parent)
                    .and_then(|_| std::fs::write(cache_file, &content))
                {
                    warn!("Could not cache catalog {}: {}", cache_file.display(), e);
                } else {
                    info!("Cached catalog {}", cache_file.display());
                }
            }
            Some(content)
        }
        Err(e) => {
            warn!("Failed to fetch catalog {}: {}. Trying cache...", url, e);
            match std::fs::read_to_string(cache_file) {
                Ok(content) => {
                    warn!("Using expired cache as fallback");
                    Some(content)
                }
                Err(_) => None,
            }
        }
    }
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::download(url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::http_status(url, response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| Error::download(url, e.to_string()))
}

/// Check if a cached file is still within its TTL
fn is_cache_valid(path: &Path, ttl: Duration) -> bool {
    if let Ok(metadata) = std::fs::metadata(path) {
        if let Ok(modified) = metadata.modified() {
            if let Ok(elapsed) = modified.elapsed() {
                return elapsed < ttl;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn x_records() -> Vec<VersionRecord> {
        vec![
            VersionRecord::new("1.0", "http://h/x-1.0.zip"),
            VersionRecord::new("1.1", "http://h/x-1.1.zip"),
        ]
    }

    #[tokio::test]
    async fn test_registered_records_resolve() {
        let catalog = VersionCatalog::new().with_records("x", x_records());

        assert_eq!(catalog.list_available("x").await.unwrap(), vec!["1.0", "1.1"]);
        assert_eq!(catalog.latest("x").await.unwrap(), "1.1");
        assert_eq!(
            catalog.resolve_url("x", "1.0").await.unwrap(),
            "http://h/x-1.0.zip"
        );
    }

    #[tokio::test]
    async fn test_unknown_version_is_catalog_error() {
        let catalog = VersionCatalog::new().with_records("x", x_records());
        let err = catalog.resolve("x", "9.9").await.unwrap_err();
        assert!(err.is_catalog());
        assert_eq!(err.to_string(), "URL for version 9.9 of x not found");
    }

    #[tokio::test]
    async fn test_empty_and_missing_catalogs_fail() {
        let catalog = VersionCatalog::new().with_records("x", vec![]);
        assert!(catalog.latest("x").await.unwrap_err().is_catalog());
        assert!(catalog.list_available("x").await.unwrap_err().is_catalog());
        assert!(catalog.list_available("nope").await.unwrap_err().is_catalog());
    }

    #[tokio::test]
    async fn test_embedded_catalogs_cover_builtin_components() {
        let catalog = VersionCatalog::embedded();
        for name in crate::components::all_names() {
            let versions = catalog.list_available(name).await.unwrap();
            assert!(!versions.is_empty(), "{} has no versions", name);
        }
    }

    #[tokio::test]
    async fn test_directory_source_overrides_embedded() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("php.json"),
            r#"[{"version": "0.0.1", "url": "http://h/php-0.0.1.zip"}]"#,
        )
        .unwrap();

        let catalog = VersionCatalog::new()
            .with_source(CatalogSource::Directory(temp.path().to_path_buf()))
            .with_source(CatalogSource::Embedded);

        assert_eq!(catalog.list_available("php").await.unwrap(), vec!["0.0.1"]);
        // Falls through to the embedded catalog for components without an override
        assert!(!catalog.list_available("nginx").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_catalog_is_catalog_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("x.json"), "{not json").unwrap();

        let catalog =
            VersionCatalog::new().with_source(CatalogSource::Directory(temp.path().to_path_buf()));
        assert!(catalog.records("x").await.unwrap_err().is_catalog());
    }

    #[test]
    fn test_from_config_orders_sources() {
        let config = CatalogConfig {
            dir: Some(PathBuf::from("/catalogs")),
            url: Some("https://example.com/catalogs/".to_string()),
            cache_ttl_secs: 60,
        };
        let catalog =
            VersionCatalog::from_config(&config, PathBuf::from("/cache"), reqwest::Client::new());

        match catalog.sources() {
            [CatalogSource::Directory(dir), CatalogSource::Remote { base_url, ttl, .. }, CatalogSource::Embedded] =>
            {
                assert_eq!(dir, &PathBuf::from("/catalogs"));
                assert_eq!(base_url, "https://example.com/catalogs");
                assert_eq!(*ttl, Duration::from_secs(60));
            }
            other => panic!("unexpected sources: {:?}", other),
        }
    }
}
