//! Runtime configuration types for operational parameters
//!
//! These types control where tools are installed, how the HTTP client
//! behaves, the archive clean-up cadence and where version catalogs are
//! read from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::utils::get_home_dir;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Root under which every component gets its own tool directory.
    /// Defaults to `~/.devstack/tools` when unset.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Install step tuning
    #[serde(default)]
    pub install: InstallConfig,

    /// Version catalog sources
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl RuntimeConfig {
    /// Resolve the tools root, falling back to `~/.devstack/tools`
    pub fn tools_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(get_home_dir()?.join(".devstack").join("tools")),
        }
    }
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Idle read timeout in seconds, 0 disables it
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Issue a GET to the URL's origin first so its cookies are sent with the download
    #[serde(default = "default_preflight")]
    pub preflight: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            preflight: default_preflight(),
        }
    }
}

fn default_http_timeout() -> u64 {
    300 // 5 minutes
}
fn default_connect_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    "DevStackManager".to_string()
}
fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}
fn default_preflight() -> bool {
    true
}

/// Install step tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Attempts made to delete a downloaded archive
    #[serde(default = "default_delete_retry_count")]
    pub delete_retry_count: u32,

    /// Delay between delete attempts in milliseconds
    #[serde(default = "default_delete_retry_delay")]
    pub delete_retry_delay_ms: u64,

    /// Pause after extraction before flattening, in milliseconds
    #[serde(default = "default_extract_settle_delay")]
    pub extract_settle_delay_ms: u64,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            delete_retry_count: default_delete_retry_count(),
            delete_retry_delay_ms: default_delete_retry_delay(),
            extract_settle_delay_ms: default_extract_settle_delay(),
        }
    }
}

fn default_delete_retry_count() -> u32 {
    5
}
fn default_delete_retry_delay() -> u64 {
    200
}
fn default_extract_settle_delay() -> u64 {
    100
}

/// Version catalog sources, consulted before the embedded catalogs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Directory holding `<component>.json` overrides
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Base URL serving `<component>.json`
    #[serde(default)]
    pub url: Option<String>,

    /// How long a fetched remote catalog stays fresh
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            url: None,
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    3600 // 1 hour
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_field_defaults() {
        let config: RuntimeConfig = serde_yaml_ng::from_str(
            r#"
network:
  http-timeout-secs: 42
"#,
        )
        .unwrap();
        assert_eq!(config.network.http_timeout_secs, 42);
        assert_eq!(config.network.user_agent, "DevStackManager");
        assert!(config.network.preflight);
        assert_eq!(config.install.delete_retry_count, 5);
        assert_eq!(config.catalog.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_tools_dir_prefers_explicit_base_dir() {
        let config = RuntimeConfig {
            base_dir: Some(PathBuf::from("/opt/devstack")),
            ..Default::default()
        };
        assert_eq!(config.tools_dir().unwrap(), PathBuf::from("/opt/devstack"));
    }
}
