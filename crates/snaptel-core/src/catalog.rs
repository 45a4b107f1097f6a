//! Public plugin catalog
//!
//! Fetches the catalog of published plugins and filters it in memory.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http;

/// Metadata of a publicly cataloged plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, rename = "type")]
    pub plugin_type: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "fork_count")]
    pub forks: u64,
    #[serde(default, rename = "star_count")]
    pub stars: u64,
    #[serde(default, rename = "watch_count")]
    pub watchers: u64,
    #[serde(default, rename = "issues_count")]
    pub issues: u64,
}

/// Substring filters applied to catalog entries; empty strings are ignored
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub plugin_type: Option<String>,
    pub name: Option<String>,
}

impl CatalogFilter {
    pub fn new(plugin_type: Option<&str>, name: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            plugin_type: non_empty(plugin_type),
            name: non_empty(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plugin_type.is_none() && self.name.is_none()
    }

    /// Check an entry against every supplied filter
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(plugin_type) = &self.plugin_type {
            if !entry.plugin_type.contains(plugin_type.as_str()) {
                return false;
            }
        }

        if let Some(name) = &self.name {
            if !entry.full_name.contains(name.as_str()) && !entry.name.contains(name.as_str()) {
                return false;
            }
        }

        true
    }

    /// Return the matching entries in source order
    pub fn apply(&self, entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
        entries
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

/// Fetch the full catalog
pub fn fetch_catalog(client: &Client, url: &str) -> Result<Vec<CatalogEntry>> {
    let entries: Vec<CatalogEntry> = http::get_json(client, url)?;
    tracing::debug!(count = entries.len(), "fetched plugin catalog");
    Ok(entries)
}

/// Render entries as a JSON array indented with four spaces
pub fn to_pretty_json(entries: &[CatalogEntry]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
