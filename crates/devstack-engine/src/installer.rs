//! Native installer runner
//!
//! The installer is downloaded into the tool directory, executed there with
//! the rendered argument string and removed afterwards. The exit status is
//! reported but does not fail the install; some vendor installers return
//! non-zero codes on success.

use devstack_core::{Error, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::fetcher::ContentFetcher;
use crate::operation::{InstallOperation, InstallState};
use crate::types::InstallWarning;

/// Download and run a native installer
///
/// `file_name` is the installer's name inside `tool_dir`; `args` is the
/// already rendered argument template.
pub async fn install(
    fetcher: &ContentFetcher,
    op: &mut InstallOperation,
    url: &str,
    tool_dir: &Path,
    file_name: &str,
    args: Option<&str>,
) -> Result<Vec<InstallWarning>> {
    let installer_path = tool_dir.join(file_name);
    op.set_download_path(installer_path.clone());

    let fetched = fetcher.fetch_to_file(url, &installer_path).await?;
    op.record_download(fetched.bytes_written);
    op.advance(InstallState::Downloaded);

    let target_dir = op.target_dir().to_path_buf();
    tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(|e| Error::file_system("Failed to create", &target_dir, e))?;

    #[cfg(unix)]
    make_executable(&installer_path).await?;

    let argv = split_args(&installer_path, args)?;

    info!("Running installer {} {}", installer_path.display(), argv.join(" "));
    let output = Command::new(&installer_path)
        .args(&argv)
        .current_dir(tool_dir)
        .output()
        .await
        .map_err(|e| Error::installer(&installer_path, e.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        debug!("Installer stdout:\n{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        debug!("Installer stderr:\n{}", stderr.trim_end());
    }

    let mut warnings = Vec::new();
    if !output.status.success() {
        warn!(
            "Installer {} exited with {}\nStderr: {}",
            installer_path.display(),
            output.status,
            stderr.trim_end()
        );
        warnings.push(InstallWarning::InstallerExit {
            code: output.status.code(),
        });
    }

    if let Err(e) = tokio::fs::remove_file(&installer_path).await {
        warn!("Could not delete installer {}: {}", installer_path.display(), e);
        warnings.push(InstallWarning::Cleanup {
            path: installer_path.clone(),
            message: e.to_string(),
        });
    }

    op.advance(InstallState::Materialized);
    Ok(warnings)
}

/// Split an argument string using shell quoting rules
///
/// `/DIR="C:\Program Files\x"` stays one argument with the quotes removed.
pub fn split_args(program: &Path, args: Option<&str>) -> Result<Vec<String>> {
    match args {
        None => Ok(Vec::new()),
        Some(args) if args.trim().is_empty() => Ok(Vec::new()),
        Some(args) => shell_words::split(args)
            .map_err(|e| Error::installer(program, format!("Invalid installer arguments: {}", e))),
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| Error::file_system("Failed to set permissions on", path, e))
}
