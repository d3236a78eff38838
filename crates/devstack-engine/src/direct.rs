//! Single-file installs (`.phar`, `.php`, plain binaries)

use devstack_core::{Error, Result};
use url::Url;

use crate::fetcher::ContentFetcher;
use crate::operation::{InstallOperation, InstallState};

/// File name for a downloaded artifact
///
/// The last non-empty URL path segment, or `<name>-<version>` when the URL
/// has none (e.g. `https://host/getfile.jsp?fileid=1` still yields
/// `getfile.jsp`, while `https://host/` yields the fallback).
pub fn download_file_name(url: &str, name: &str, version: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))
        })
        .filter(|segment| segment != "." && segment != "..")
        .unwrap_or_else(|| format!("{}-{}", name, version))
}

/// Download `url` into `<target_dir>/<file_name>`
pub async fn install(
    fetcher: &ContentFetcher,
    op: &mut InstallOperation,
    url: &str,
    file_name: &str,
) -> Result<()> {
    let target_dir = op.target_dir().to_path_buf();
    tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(|e| Error::file_system("Failed to create", &target_dir, e))?;

    let dest = target_dir.join(file_name);
    op.set_download_path(dest.clone());

    let fetched = fetcher.fetch_to_file(url, &dest).await?;
    op.record_download(fetched.bytes_written);
    op.advance(InstallState::Downloaded);
    op.advance(InstallState::Materialized);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_last_segment() {
        assert_eq!(
            download_file_name("https://getcomposer.org/download/2.7.0/composer.phar", "composer", "2.7.0"),
            "composer.phar"
        );
        assert_eq!(
            download_file_name("https://h/files/adminer-5.4.1.php?x=1", "adminer", "5.4.1"),
            "adminer-5.4.1.php"
        );
    }

    #[test]
    fn test_file_name_falls_back_to_name_version() {
        assert_eq!(download_file_name("https://h/", "tool", "1.0"), "tool-1.0");
        assert_eq!(download_file_name("not a url", "tool", "1.0"), "tool-1.0");
    }
}
