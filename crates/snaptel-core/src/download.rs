//! Downloader
//!
//! Streams a remote resource into a local file. The target is created (and
//! truncated) before the request is sent; a failed transfer leaves whatever was
//! written in place.

use std::fs::File;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::error::{Result, SnaptelError};

/// Outcome of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// File name derived from the last path segment of a URL
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Resolve where a download lands: `name` when given, otherwise the URL's last segment
pub fn target_path(dir: &Path, url: &str, name: Option<&str>) -> PathBuf {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => file_name_from_url(url),
    };
    dir.join(name)
}

/// Download `url` into `target`
pub fn download(client: &Client, url: &str, target: &Path) -> Result<DownloadReport> {
    let mut output = File::create(target).map_err(|source| SnaptelError::CreateFailed {
        path: target.to_path_buf(),
        source,
    })?;

    tracing::debug!(url, target = %target.display(), "downloading");
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| SnaptelError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SnaptelError::FetchFailed {
            url: url.to_string(),
            message: format!("server returned {}", status),
        });
    }

    let bytes = response
        .copy_to(&mut output)
        .map_err(|e| SnaptelError::WriteFailed {
            path: target.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::info!(url, bytes, target = %target.display(), "download complete");
    Ok(DownloadReport {
        path: target.to_path_buf(),
        bytes,
    })
}
