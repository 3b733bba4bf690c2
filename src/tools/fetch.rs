use crate::error::{Error, Result};
use crate::utils::files::ensure_directory;
use crate::utils::images::validate_image_bytes;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://wwwhomes.uni-bielefeld.de/bildwis/bigImages/";
pub const DEFAULT_AUTH: &str = "Basic YmtnOmJrZ3Bhc3N3b3Jk";
pub const DEFAULT_START: u32 = 445;
pub const DEFAULT_COUNT: u32 = 660;

/// Settings for one sequential download run
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    /// First index requested
    pub start: u32,
    /// Last index requested (inclusive)
    pub count: u32,
    pub output: PathBuf,
    /// Pause after every attempt
    pub delay: Duration,
    /// Value of the `Authorization` header sent with every request
    pub auth: String,
    /// Leave indices whose file is already on disk alone
    pub skip_existing: bool,
    /// Require the body to decode as an image before writing it
    pub verify: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start: DEFAULT_START,
            count: DEFAULT_COUNT,
            output: PathBuf::from("images"),
            delay: Duration::from_secs(1),
            auth: DEFAULT_AUTH.to_string(),
            skip_existing: false,
            verify: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Downloaded(PathBuf),
    /// The file already existed and no request was made
    Skipped(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub index: u32,
    pub url: String,
    pub status: FetchStatus,
}

#[derive(Debug, Default)]
pub struct FetchReport {
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchReport {
    pub fn downloaded(&self) -> usize {
        self.count(|s| matches!(s, FetchStatus::Downloaded(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FetchStatus::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FetchStatus::Failed(_)))
    }

    /// Number of HTTP requests that were issued
    pub fn attempted(&self) -> usize {
        self.outcomes.len() - self.skipped()
    }

    fn count(&self, pred: impl Fn(&FetchStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// File name for an index: three-digit zero-padded with `.jpg`
pub fn image_filename(index: u32) -> String {
    format!("{:03}.jpg", index)
}

/// Download address for an index
///
/// A base URL without a trailing slash gets one.
pub fn image_url(base_url: &str, index: u32) -> String {
    let filename = image_filename(index);
    if base_url.ends_with('/') {
        format!("{}{}", base_url, filename)
    } else {
        format!("{}/{}", base_url, filename)
    }
}

/// Download every index in `start..=count`, one request at a time
///
/// Failed requests are recorded and the loop moves on; only filesystem
/// errors end the run early.
pub async fn fetch_images(client: &reqwest::Client, config: &FetchConfig) -> Result<FetchReport> {
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "base URL must start with http:// or https://, got {:?}",
            config.base_url
        )));
    }
    ensure_directory(&config.output)?;

    let mut auth = HeaderValue::from_str(&config.auth).map_err(|source| Error::Header {
        name: "Authorization",
        source,
    })?;
    auth.set_sensitive(true);

    let total = if config.start <= config.count {
        u64::from(config.count - config.start) + 1
    } else {
        tracing::warn!(
            start = config.start,
            count = config.count,
            "start index is past the last index, nothing to fetch"
        );
        0
    };

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );

    let mut report = FetchReport::default();

    for index in config.start..=config.count {
        let filename = image_filename(index);
        let url = image_url(&config.base_url, index);
        let output_path = config.output.join(&filename);

        if config.skip_existing && output_path.exists() {
            tracing::debug!(%url, "already on disk, skipping");
            report.outcomes.push(FetchOutcome {
                index,
                url,
                status: FetchStatus::Skipped(output_path),
            });
            pb.inc(1);
            continue;
        }

        let status = match download(client, &url, &auth, config.verify).await {
            Ok(bytes) => {
                write_image(&output_path, &bytes)?;
                tracing::debug!(%url, bytes = bytes.len(), "downloaded");
                FetchStatus::Downloaded(output_path)
            }
            Err(reason) => {
                tracing::warn!(%url, error = %reason, "download failed");
                FetchStatus::Failed(reason)
            }
        };
        if let Some(line) = status_line(&filename, &status) {
            // a hidden bar drops `println`, suspend keeps stdout output
            pb.suspend(|| println!("{}", line));
        }
        report.outcomes.push(FetchOutcome { index, url, status });
        pb.inc(1);

        tokio::time::sleep(config.delay).await;
    }

    pb.finish_and_clear();
    Ok(report)
}

/// Console line for one attempt; skipped files print nothing
pub fn status_line(filename: &str, status: &FetchStatus) -> Option<String> {
    match status {
        FetchStatus::Downloaded(_) => Some(format!("Downloaded {}", filename)),
        FetchStatus::Failed(reason) => Some(format!("Failed to download {}: {}", filename, reason)),
        FetchStatus::Skipped(_) => None,
    }
}

async fn download(
    client: &reqwest::Client,
    url: &str,
    auth: &HeaderValue,
    verify: bool,
) -> std::result::Result<Vec<u8>, String> {
    let response = client
        .get(url)
        .header(AUTHORIZATION, auth.clone())
        .send()
        .await
        .map_err(|e| format!("HTTP request failed: {}", e))?;

    // 3xx only reaches us when redirects are disabled
    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(format!("HTTP {} for url ({})", status, url));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Failed to read response bytes: {}", e))?;

    if verify {
        validate_image_bytes(&bytes).map_err(|e| format!("Corrupted image: {}", e))?;
    }

    Ok(bytes.to_vec())
}

fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| Error::io(path, e))
}
