//! Component post-install hooks
//!
//! Hooks run once after the generic install and finalization succeeded.
//! They return a short note per action taken; an error from a hook is
//! turned into a warning by the orchestrator and never rolls back.

use devstack_core::{ComponentDescriptor, Error, PostInstallHook, Result};
use rust_embed::RustEmbed;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::finalize::{rename_main_executable, versioned_file_name};

/// Curated configuration files written by hooks
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/templates/"]
#[prefix = ""]
struct EmbeddedTemplates;

const PHP_INI_TEMPLATE: &str = "php.ini";

/// Extensions enabled in php.ini when the build ships them
const PHP_EXTENSION_ALLOW_LIST: &[&str] = &[
    "mbstring", "intl", "pdo", "pdo_mysql", "pdo_pgsql", "openssl", "json", "fileinfo", "curl",
    "gd", "gd2", "zip", "xml", "xmlrpc",
];

const NPM_LAUNCHERS: &[&str] = &["npm", "npm.cmd", "npm.ps1"];
const NPX_LAUNCHERS: &[&str] = &["npx", "npx.cmd", "npx.ps1"];

/// Inputs shared by every hook
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub descriptor: &'a ComponentDescriptor,
    pub version: &'a str,
    pub target_dir: &'a Path,
}

/// Run a post-install hook
pub fn run(hook: PostInstallHook, ctx: &HookContext<'_>) -> Result<Vec<String>> {
    match hook {
        PostInstallHook::None => Ok(Vec::new()),
        PostInstallHook::PhpIni => php_ini(ctx),
        PostInstallHook::NodeShortcuts => node_shortcuts(ctx),
    }
}

fn php_ini(ctx: &HookContext<'_>) -> Result<Vec<String>> {
    let mut notes = Vec::new();

    let template = EmbeddedTemplates::get(PHP_INI_TEMPLATE).ok_or_else(|| {
        Error::invalid_config(format!("Embedded template not found: {}", PHP_INI_TEMPLATE))
    })?;

    let ini_path = ctx.target_dir.join("php.ini");
    fs::write(&ini_path, template.data.as_ref())
        .map_err(|e| Error::file_system("Failed to write", &ini_path, e))?;
    info!("php.ini written to {}", ctx.target_dir.display());
    notes.push("php.ini written".to_string());

    let extensions = enabled_php_extensions(&ctx.target_dir.join("ext"))?;
    if !extensions.is_empty() {
        let mut block = String::from("\n; Essential extensions\n");
        for name in &extensions {
            block.push_str(&format!("extension={}\n", name));
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&ini_path)
            .map_err(|e| Error::file_system("Failed to open", &ini_path, e))?;
        file.write_all(block.as_bytes())
            .map_err(|e| Error::file_system("Failed to write", &ini_path, e))?;

        info!("Enabled PHP extensions: {}", extensions.join(", "));
        notes.push(format!("enabled {} extensions", extensions.len()));
    }

    if let Some(renamed) = rename_main_executable(ctx.target_dir, "php-cgi.exe", ctx.version, "php-cgi")? {
        notes.push(format!("renamed php-cgi.exe to {}", file_name(&renamed)));
    }

    Ok(notes)
}

/// Allow-listed extensions present as `ext/php_<name>.dll`, sorted
pub fn enabled_php_extensions(ext_dir: &Path) -> Result<Vec<String>> {
    if !ext_dir.is_dir() {
        debug!("No ext directory at {}", ext_dir.display());
        return Ok(Vec::new());
    }

    let entries =
        fs::read_dir(ext_dir).map_err(|e| Error::file_system("Failed to read", ext_dir, e))?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let file = entry.file_name().to_string_lossy().to_ascii_lowercase();
            let stem = file.strip_suffix(".dll")?.strip_prefix("php_")?.to_string();
            PHP_EXTENSION_ALLOW_LIST.contains(&stem.as_str()).then_some(stem)
        })
        .collect();

    names.sort();
    names.dedup();
    Ok(names)
}

fn node_shortcuts(ctx: &HookContext<'_>) -> Result<Vec<String>> {
    let npm_version = bundled_npm_version(ctx.target_dir, ctx.descriptor.name())?;
    let mut notes = Vec::new();

    for (prefix, launchers) in [("npm", NPM_LAUNCHERS), ("npx", NPX_LAUNCHERS)] {
        for launcher in launchers {
            let source = ctx.target_dir.join(launcher);
            if !source.is_file() {
                continue;
            }
            let renamed = ctx
                .target_dir
                .join(versioned_file_name(prefix, &npm_version, &source));
            fs::rename(&source, &renamed)
                .map_err(|e| Error::file_system("Failed to rename", &source, e))?;
            info!("Renamed {} to {}", launcher, file_name(&renamed));
            notes.push(format!("renamed {} to {}", launcher, file_name(&renamed)));
        }
    }

    Ok(notes)
}

/// Version of npm shipped inside a node distribution
pub fn bundled_npm_version(target_dir: &Path, component: &str) -> Result<String> {
    let package_json = target_dir.join("node_modules").join("npm").join("package.json");
    let content = fs::read_to_string(&package_json)
        .map_err(|e| Error::file_system("Failed to read", &package_json, e))?;
    let manifest: serde_json::Value = serde_json::from_str(&content)?;

    manifest
        .get("version")
        .and_then(|v| v.as_str())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_component(component, "npm package.json has no version"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
