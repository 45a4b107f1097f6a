use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnaptelError};

const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_CLIENT_URL: &str = "http://localhost:8181";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_CATALOG_URL: &str = "http://staging.webapi.snap-telemetry.io/plugin";
pub const DEFAULT_RELEASE_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DOWNLOAD_HOST: &str = "https://github.com";
pub const DEFAULT_RELEASE_OWNER: &str = "intelsdi-x";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# snaptel configuration file
# Location: ~/.snaptel/config.toml

[client]
# Control plane endpoint (overridden by --url / SNAPTEL_URL)
url = "http://localhost:8181"
# REST API version prefix
api_version = "v1"

[catalog]
# Public plugin catalog endpoint used by list-catalog
url = "http://staging.webapi.snap-telemetry.io/plugin"

[release]
# Source-hosting API queried for the latest release of a plugin repository
api_url = "https://api.github.com"
# Host serving release downloads
download_host = "https://github.com"
# Repository owner for release-links / download-release
owner = "intelsdi-x"
# Artifact prefix for download-release (default: the repository name)
# artifact_name = "snap-plugin-publisher-file"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Control plane connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_url")]
    pub url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
}

/// Release lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default = "default_release_api_url")]
    pub api_url: String,

    #[serde(default = "default_download_host")]
    pub download_host: String,

    #[serde(default = "default_release_owner")]
    pub owner: String,

    /// Artifact prefix; falls back to the repository name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_name: Option<String>,
}

fn default_client_url() -> String {
    DEFAULT_CLIENT_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_release_api_url() -> String {
    DEFAULT_RELEASE_API_URL.to_string()
}

fn default_download_host() -> String {
    DEFAULT_DOWNLOAD_HOST.to_string()
}

fn default_release_owner() -> String {
    DEFAULT_RELEASE_OWNER.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_client_url(),
            api_version: default_api_version(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            api_url: default_release_api_url(),
            download_host: default_download_host(),
            owner: default_release_owner(),
            artifact_name: None,
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| SnaptelError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Default base directory (~/.snaptel)
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".snaptel"))
            .ok_or(SnaptelError::HomeNotFound)
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "client.url" => Some(self.client.url.clone()),
            "client.api_version" => Some(self.client.api_version.clone()),
            "catalog.url" => Some(self.catalog.url.clone()),
            "release.api_url" => Some(self.release.api_url.clone()),
            "release.download_host" => Some(self.release.download_host.clone()),
            "release.owner" => Some(self.release.owner.clone()),
            "release.artifact_name" => Some(self.release.artifact_name.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim().to_string();
        match key {
            "client.url" => self.client.url = value,
            "client.api_version" => self.client.api_version = value,
            "catalog.url" => self.catalog.url = value,
            "release.api_url" => self.release.api_url = value,
            "release.download_host" => self.release.download_host = value,
            "release.owner" => self.release.owner = value,
            "release.artifact_name" => {
                self.release.artifact_name = if value.is_empty() { None } else { Some(value) };
            }
            _ => {
                return Err(SnaptelError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        [
            "client.url",
            "client.api_version",
            "catalog.url",
            "release.api_url",
            "release.download_host",
            "release.owner",
            "release.artifact_name",
        ]
        .iter()
        .map(|key| (key.to_string(), self.get(key).unwrap_or_default()))
        .collect()
    }
}
