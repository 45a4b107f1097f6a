//! Plugin result types
//!
//! Shapes returned by the control plane for load, unload, swap and list calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A plugin the control plane reports as loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedPlugin {
    pub name: String,
    pub version: i64,
    #[serde(rename = "type")]
    pub plugin_type: String,
    #[serde(default)]
    pub signed: bool,
    #[serde(default)]
    pub status: String,
    /// Unix seconds
    #[serde(default)]
    pub loaded_timestamp: i64,
}

impl LoadedPlugin {
    pub fn loaded_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.loaded_timestamp, 0).unwrap_or_default()
    }
}

/// A plugin the control plane reports as unloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnloadedPlugin {
    pub name: String,
    pub version: i64,
    #[serde(rename = "type")]
    pub plugin_type: String,
}

/// Result of a successful swap: both sides completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub loaded: LoadedPlugin,
    pub unloaded: UnloadedPlugin,
}

/// A plugin instance currently serving tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningPlugin {
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    #[serde(default, rename = "hitcount")]
    pub hit_count: u64,
    /// Unix seconds
    #[serde(default)]
    pub last_hit_timestamp: i64,
    #[serde(default)]
    pub pprof_port: String,
}

impl RunningPlugin {
    pub fn last_hit(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.last_hit_timestamp, 0).unwrap_or_default()
    }
}

/// Response of a plugin listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginList {
    #[serde(default)]
    pub loaded_plugins: Vec<LoadedPlugin>,
    #[serde(default)]
    pub running_plugins: Vec<RunningPlugin>,
}
