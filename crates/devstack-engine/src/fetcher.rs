//! Browser-like HTTP downloads streamed to disk
//!
//! Some tool vendors reject requests that do not look like they come from
//! a browser. The fetcher therefore:
//! - Sends generic browser headers (wildcard Accept, Accept-Language,
//!   Referer set to the URL origin, keep-alive, Sec-Fetch-*)
//! - Follows redirects and keeps a cookie jar for the client's lifetime
//! - Optionally visits the origin first so its cookies ride along
//! - Streams the body chunk by chunk into the destination file
//!
//! No retry is attempted here. A non-success status is a download error.

use devstack_core::types::NetworkConfig;
use devstack_core::{Error, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// Result of a completed download
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// File the body was written to
    pub path: PathBuf,

    /// Body size in bytes
    pub bytes_written: u64,

    /// Final HTTP status
    pub status: u16,

    /// URL after redirects
    pub final_url: String,
}

/// HTTP client wrapper shared by all install operations
///
/// Cloning is cheap; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct ContentFetcher {
    client: reqwest::Client,
    accept_language: String,
    preflight: bool,
    show_progress: bool,
}

impl ContentFetcher {
    /// Build a fetcher with its own client from network settings
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = Self::build_client(network)?;
        Ok(Self::with_client(client, network))
    }

    /// Use an externally constructed client
    ///
    /// The client should have a cookie store enabled for the preflight
    /// request to have any effect.
    pub fn with_client(client: reqwest::Client, network: &NetworkConfig) -> Self {
        Self {
            client,
            accept_language: network.accept_language.clone(),
            preflight: network.preflight,
            show_progress: false,
        }
    }

    /// Construct the HTTP client used for downloads
    ///
    /// `http_timeout_secs` bounds each read rather than the whole request,
    /// so a stalled server fails while a slow but steady download of a
    /// large archive does not. A value of 0 leaves it unset.
    pub fn build_client(network: &NetworkConfig) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .connect_timeout(Duration::from_secs(network.connect_timeout_secs));

        if network.http_timeout_secs > 0 {
            builder = builder.read_timeout(Duration::from_secs(network.http_timeout_secs));
        }

        builder
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Underlying HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// `scheme://host[:port]` of a URL
    pub fn origin(url: &Url) -> String {
        url.origin().ascii_serialization()
    }

    /// Headers sent with every request to `url`
    pub fn browser_headers(&self, url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if let Ok(value) = HeaderValue::from_str(&self.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("{}/", Self::origin(url))) {
            headers.insert(REFERER, value);
        }
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("cross-site"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("no-cors"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers
    }

    /// Download `url` into `dest`, streaming the body
    ///
    /// On failure the partially written file is removed.
    pub async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<FetchResult> {
        let parsed = parse_url(url)?;

        if self.preflight {
            self.preflight(&parsed).await;
        }

        debug!("GET {}", url);
        let response = self
            .client
            .get(parsed.clone())
            .headers(self.browser_headers(&parsed))
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let total_size = response.content_length();

        let progress = self.progress_bar(total_size, dest);

        let result = self.stream_body(url, response, dest, progress.as_ref()).await;

        match result {
            Ok(bytes_written) => {
                if let Some(pb) = progress {
                    pb.finish_and_clear();
                }
                info!("Downloaded {} ({})", url, human_readable_size(bytes_written));
                Ok(FetchResult {
                    path: dest.to_path_buf(),
                    bytes_written,
                    status: status.as_u16(),
                    final_url,
                })
            }
            Err(e) => {
                if let Some(pb) = progress {
                    pb.abandon();
                }
                let _ = tokio::fs::remove_file(dest).await;
                Err(e)
            }
        }
    }

    /// Issue a HEAD request and report the status code
    pub async fn probe(&self, url: &str) -> Result<u16> {
        let parsed = parse_url(url)?;
        let response = self
            .client
            .head(parsed.clone())
            .headers(self.browser_headers(&parsed))
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;
        Ok(response.status().as_u16())
    }

    /// Visit the origin so cookies it sets are stored; failures are ignored
    async fn preflight(&self, url: &Url) {
        let origin = Self::origin(url);
        debug!("Preflight request to {}", origin);
        match self
            .client
            .get(&origin)
            .headers(self.browser_headers(url))
            .send()
            .await
        {
            Ok(response) => debug!("Preflight {} answered {}", origin, response.status()),
            Err(e) => debug!("Preflight {} failed: {}", origin, e),
        }
    }

    async fn stream_body(
        &self,
        url: &str,
        response: reqwest::Response,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64> {
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| Error::file_system("Failed to create", dest, e))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::download(url, e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::file_system("Failed to write", dest, e))?;

            downloaded += chunk.len() as u64;
            if let Some(pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush()
            .await
            .map_err(|e| Error::file_system("Failed to write", dest, e))?;

        Ok(downloaded)
    }

    fn progress_bar(&self, total: Option<u64>, dest: &Path) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(format!("Downloading {}", name));
        Some(pb)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    if url.trim().is_empty() {
        return Err(Error::download(url, "Invalid URL for download"));
    }
    Url::parse(url).map_err(|e| Error::download(url, format!("Invalid URL: {}", e)))
}

/// Convert bytes to human-readable size
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
