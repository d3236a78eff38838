//! Engine configuration and `DevStack` construction for tests

use devstack_core::types::{InstallConfig, NetworkConfig};
use devstack_core::{ComponentDescriptor, VersionRecord};
use devstack_engine::{ContentFetcher, DevStack, InstallOrchestrator, PathManager, VersionCatalog};
use std::path::Path;
use std::sync::Arc;

use super::constants::*;
use super::path_manager::RecordingPathManager;

/// Network settings without the origin preflight request
pub fn test_network() -> NetworkConfig {
    NetworkConfig {
        http_timeout_secs: 10,
        connect_timeout_secs: 5,
        preflight: false,
        ..Default::default()
    }
}

/// Install settings with no settle delay and fast delete retries
pub fn test_install_config() -> InstallConfig {
    InstallConfig {
        delete_retry_count: 2,
        delete_retry_delay_ms: 10,
        extract_settle_delay_ms: 0,
    }
}

pub fn test_fetcher() -> ContentFetcher {
    ContentFetcher::new(&test_network()).unwrap()
}

pub fn test_orchestrator() -> InstallOrchestrator {
    InstallOrchestrator::new(test_fetcher(), test_install_config())
}

/// `DevStack` rooted at `base_dir` with no catalog sources
///
/// Catalog entries are registered per test with `register_catalog`.
pub fn test_devstack(base_dir: &Path, path_manager: Arc<dyn PathManager>) -> DevStack {
    DevStack::with_parts(
        base_dir.to_path_buf(),
        VersionCatalog::new(),
        test_orchestrator(),
        path_manager,
    )
    .unwrap()
}

/// Zip-distributed component `x`
pub fn x_descriptor(base_dir: &Path) -> ComponentDescriptor {
    ComponentDescriptor::new(X_NAME, base_dir.join(X_NAME))
        .unwrap()
        .archive()
}

/// Single-file component `tool`
pub fn tool_descriptor(base_dir: &Path) -> ComponentDescriptor {
    ComponentDescriptor::new(TOOL_NAME, base_dir.join(TOOL_NAME)).unwrap()
}

/// `DevStack` with component `x` whose catalog lists the given routes
pub fn x_devstack(
    base_dir: &Path,
    server_uri: &str,
    versions: &[(&str, &str)],
) -> (DevStack, Arc<RecordingPathManager>) {
    let path_manager = Arc::new(RecordingPathManager::new());
    let mut stack = test_devstack(base_dir, path_manager.clone());
    stack.register(x_descriptor(base_dir));
    stack.register_catalog(
        X_NAME,
        versions
            .iter()
            .map(|(version, route)| VersionRecord::new(*version, format!("{}{}", server_uri, route)))
            .collect(),
    );
    (stack, path_manager)
}
