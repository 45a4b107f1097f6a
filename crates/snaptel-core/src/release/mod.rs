//! Release Resolver
//!
//! Looks up the latest release of a plugin repository and derives download
//! links from it.
//!
//! - `platform`: host OS/architecture identifiers used in artifact names

pub mod platform;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::ReleaseConfig;
use crate::error::{Result, SnaptelError};
use crate::http;

pub use platform::Platform;

/// Latest-release descriptor, decoded with its shape validated.
///
/// `tag_name` is kept raw so a bad tag only fails the operations that read it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<serde_json::Value>,
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub browser_download_url: String,
}

impl Release {
    /// Decode a release document, rejecting unexpected shapes
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| SnaptelError::MalformedRelease {
            reason: e.to_string(),
        })
    }

    /// Download URLs of every attached asset, in document order
    pub fn download_urls(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.browser_download_url.as_str())
    }

    /// Leading component of the tag: `"2.4.1-beta"` becomes `"2"`
    pub fn major_tag(&self) -> Result<&str> {
        let tag = match &self.tag_name {
            Some(serde_json::Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Err(SnaptelError::MalformedRelease {
                    reason: format!("`tag_name` is not a string: {}", other),
                })
            }
            None => {
                return Err(SnaptelError::MalformedRelease {
                    reason: "missing field `tag_name`".to_string(),
                })
            }
        };
        Ok(tag.split('.').next().unwrap_or(tag))
    }
}

/// Resolves releases for repositories under the configured owner
pub struct ReleaseResolver<'a> {
    client: &'a Client,
    config: &'a ReleaseConfig,
}

impl<'a> ReleaseResolver<'a> {
    pub fn new(client: &'a Client, config: &'a ReleaseConfig) -> Self {
        Self { client, config }
    }

    /// API endpoint of the latest release for a repository
    pub fn latest_url(&self, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            repo
        )
    }

    /// Fetch the latest release of a repository (single attempt)
    pub fn latest(&self, repo: &str) -> Result<Release> {
        let url = self.latest_url(repo);
        let value: serde_json::Value = http::get_json(self.client, &url)?;
        Release::from_value(value)
    }

    /// Platform-specific artifact URL for a release.
    ///
    /// Fails before building anything when the architecture has no artifact.
    pub fn asset_url(&self, repo: &str, release: &Release, platform: &Platform) -> Result<String> {
        let arch = platform.asset_arch()?;
        let tag = release.major_tag()?;
        let artifact = self.config.artifact_name.as_deref().unwrap_or(repo);

        Ok(format!(
            "{}/{}/{}/releases/download/{}/{}_{}_{}",
            self.config.download_host.trim_end_matches('/'),
            self.config.owner,
            repo,
            tag,
            artifact,
            platform.os,
            arch
        ))
    }
}
