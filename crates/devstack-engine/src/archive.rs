//! Zip archive installation
//!
//! The archive is downloaded next to the version directories as
//! `<tool_dir>/<name>-<version>.zip`, extracted into the target directory
//! and then removed. Many publishers wrap everything in one top-level
//! folder (`nginx-1.25.3/...`); when every entry shares such a folder its
//! contents are moved up so the version directory holds the files directly.

use devstack_core::types::InstallConfig;
use devstack_core::{Error, Result};
use regex::Regex;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::fetcher::ContentFetcher;
use crate::operation::{InstallOperation, InstallState};
use crate::types::InstallWarning;

/// Name given to the wrapper folder while its children are moved out
const FLATTEN_STAGING_SUFFIX: &str = ".devstack-flatten";

static TOP_FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/\\]+)[/\\]").expect("top folder regex is valid"));

/// Temporary zip path for a version
pub fn temp_archive_path(tool_dir: &Path, name: &str, version: &str) -> PathBuf {
    tool_dir.join(format!("{}-{}.zip", name, version))
}

/// Download, extract, flatten and clean up
///
/// The target directory must already exist. Returns non-fatal warnings,
/// currently only a failure to delete the temporary zip.
pub async fn install(
    fetcher: &ContentFetcher,
    settings: &InstallConfig,
    op: &mut InstallOperation,
    url: &str,
    zip_path: &Path,
) -> Result<Vec<InstallWarning>> {
    op.set_download_path(zip_path.to_path_buf());
    let fetched = fetcher.fetch_to_file(url, zip_path).await?;
    op.record_download(fetched.bytes_written);
    op.advance(InstallState::Downloaded);

    info!("Extracting {}", zip_path.display());
    let target_dir = op.target_dir().to_path_buf();
    let top_folder = extract(zip_path, &target_dir).await?;

    tokio::time::sleep(Duration::from_millis(settings.extract_settle_delay_ms)).await;

    if let Some(folder) = &top_folder {
        flatten(&target_dir, folder).map_err(|e| {
            Error::extraction(zip_path, format!("Failed to flatten {}: {}", folder, e))
        })?;
    }
    op.set_top_level_folder(top_folder);

    let mut warnings = Vec::new();
    if let Some(warning) = delete_with_retry(
        zip_path,
        settings.delete_retry_count,
        Duration::from_millis(settings.delete_retry_delay_ms),
    )
    .await
    {
        warnings.push(warning);
    }

    op.advance(InstallState::Materialized);
    Ok(warnings)
}

/// Extract `zip_path` into `target_dir` on the blocking pool
///
/// Returns the common top-level folder, if any.
pub async fn extract(zip_path: &Path, target_dir: &Path) -> Result<Option<String>> {
    let zip_path = zip_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    let archive_for_error = zip_path.clone();

    tokio::task::spawn_blocking(move || extract_blocking(&zip_path, &target_dir))
        .await
        .map_err(|e| Error::extraction(archive_for_error, format!("Extraction task failed: {}", e)))?
}

fn extract_blocking(zip_path: &Path, target_dir: &Path) -> Result<Option<String>> {
    let file = File::open(zip_path).map_err(|e| Error::extraction(zip_path, e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::extraction(zip_path, e.to_string()))?;

    let names = entry_names(&mut archive).map_err(|e| Error::extraction(zip_path, e.to_string()))?;
    let top_folder = common_top_folder(names.iter().map(String::as_str));

    fs::create_dir_all(target_dir)
        .map_err(|e| Error::file_system("Failed to create", target_dir, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::extraction(zip_path, e.to_string()))?;

        let entry_path = match entry.enclosed_name() {
            Some(path) => path.to_owned(),
            None => {
                debug!("Skipping unsafe path in zip: {}", entry.name());
                continue;
            }
        };

        let dest_path = target_dir.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path)
                .map_err(|e| Error::file_system("Failed to create", &dest_path, e))?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::file_system("Failed to create", parent, e))?;
            }

            let mut outfile = File::create(&dest_path)
                .map_err(|e| Error::file_system("Failed to create", &dest_path, e))?;
            io::copy(&mut entry, &mut outfile)
                .map_err(|e| Error::extraction(zip_path, format!("{}: {}", entry_path.display(), e)))?;

            #[cfg(unix)]
            set_unix_permissions(&dest_path, entry.unix_mode());
        }
    }

    debug!("ZIP extraction complete");
    Ok(top_folder)
}

/// Entry names in central directory order
fn entry_names<R: io::Read + io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> zip::result::ZipResult<Vec<String>> {
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index_raw(i)?.name().to_string());
    }
    Ok(names)
}

/// Wrapper folder shared by every entry
///
/// The candidate comes from the first entry's leading path segment; it is
/// only accepted when all other entries live under it too. Leading `./`
/// segments are ignored and `..` never counts as a wrapper.
pub fn common_top_folder<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut names = names.map(trim_current_dir).filter(|name| !name.is_empty());

    let first = names.next()?;
    let folder = TOP_FOLDER_RE
        .captures(first)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|folder| folder != "." && folder != "..")?;

    let shared = names.all(|name| {
        name.strip_prefix(folder.as_str())
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('\\'))
    });

    shared.then_some(folder)
}

/// Strip any number of leading `./` (or `.\\`) segments
fn trim_current_dir(mut name: &str) -> &str {
    while let Some(rest) = name.strip_prefix("./").or_else(|| name.strip_prefix(".\\")) {
        name = rest;
    }
    name
}

/// Move every child of `<target_dir>/<folder>` into `target_dir`
///
/// The wrapper is renamed aside first so a child with the same name as
/// the wrapper can be moved without colliding with it.
pub fn flatten(target_dir: &Path, folder: &str) -> io::Result<()> {
    let wrapper = target_dir.join(folder);
    if !wrapper.is_dir() {
        return Ok(());
    }

    let staging = target_dir.join(format!("{}{}", folder, FLATTEN_STAGING_SUFFIX));
    fs::rename(&wrapper, &staging)?;

    for entry in fs::read_dir(&staging)? {
        let entry = entry?;
        let dest = target_dir.join(entry.file_name());
        fs::rename(entry.path(), dest)?;
    }

    fs::remove_dir(&staging)?;
    debug!("Flattened {} into {}", folder, target_dir.display());
    Ok(())
}

/// Delete a file, retrying while it is held open by another process
///
/// Returns a warning instead of an error when every attempt fails.
pub async fn delete_with_retry(
    path: &Path,
    attempts: u32,
    delay: Duration,
) -> Option<InstallWarning> {
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match tokio::fs::remove_file(path).await {
            Ok(()) => return None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!(
                    "Delete attempt {}/{} for {} failed: {}",
                    attempt,
                    attempts,
                    path.display(),
                    e
                );
                last_error = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string());
    warn!("Could not delete {}: {}", path.display(), message);
    Some(InstallWarning::Cleanup {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(unix)]
fn set_unix_permissions(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777)) {
            debug!("Could not set permissions on {}: {}", path.display(), e);
        }
    }
}
