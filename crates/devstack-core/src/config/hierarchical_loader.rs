//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Runtime config (~/.devstack/devstack-runtime.yaml, or an explicit file)
//! 3. Environment variables (DEVSTACK_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const RUNTIME_CONFIG_FILE: &str = "devstack-runtime.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,

    /// Explicit runtime config file replacing `<config_dir>/devstack-runtime.yaml`
    config_file: Option<Utf8PathBuf>,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self {
            config_dir,
            config_file: None,
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir,
            config_file: None,
        }
    }

    /// Read the runtime layer from a specific file instead of the config directory
    pub fn with_file(mut self, config_file: Utf8PathBuf) -> Self {
        self.config_file = Some(config_file);
        self
    }

    /// Get the standard config directory (~/.devstack)
    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::invalid_config("Could not determine home directory"))?;

        Ok(Utf8PathBuf::from(home).join(".devstack"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        // Start with embedded defaults
        let mut config = Self::load_embedded_config::<RuntimeConfig>("engine-defaults.yaml")?;

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                let file_config = self.load_yaml_file::<RuntimeConfig>(path)?;
                config = Self::merge_runtime_config(config, file_config);
            }
            None => {
                let runtime_config_path = self.config_dir.join(RUNTIME_CONFIG_FILE);
                if runtime_config_path.exists() {
                    let file_config = self.load_yaml_file::<RuntimeConfig>(&runtime_config_path)?;
                    config = Self::merge_runtime_config(config, file_config);
                }
            }
        }

        // Apply environment variable overrides
        config = self.apply_env_overrides(config)?;

        Ok(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        let config: T = serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })?;

        Ok(config)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        debug!("Loading runtime config from {}", path);
        let content = fs::read_to_string(path)?;
        let config: T = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        Ok(config)
    }

    /// Merge two runtime configs (base is overridden by overlay)
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            base_dir: overlay.base_dir.or(base.base_dir),
            network: overlay.network,
            install: overlay.install,
            catalog: crate::types::CatalogConfig {
                dir: overlay.catalog.dir.or(base.catalog.dir),
                url: overlay.catalog.url.or(base.catalog.url),
                cache_ttl_secs: overlay.catalog.cache_ttl_secs,
            },
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("DEVSTACK_BASE_DIR") {
            config.base_dir = Some(PathBuf::from(val));
        }

        // Network
        if let Ok(val) = env::var("DEVSTACK_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("DEVSTACK_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("DEVSTACK_CONNECT_TIMEOUT_SECS") {
            config.network.connect_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("DEVSTACK_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("DEVSTACK_USER_AGENT") {
            config.network.user_agent = val;
        }

        if let Ok(val) = env::var("DEVSTACK_PREFLIGHT") {
            config.network.preflight = val
                .parse()
                .map_err(|_| Error::invalid_config("DEVSTACK_PREFLIGHT must be true or false"))?;
        }

        // Catalog sources
        if let Ok(val) = env::var("DEVSTACK_CATALOG_DIR") {
            config.catalog.dir = Some(PathBuf::from(val));
        }

        if let Ok(val) = env::var("DEVSTACK_CATALOG_URL") {
            config.catalog.url = Some(val);
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
