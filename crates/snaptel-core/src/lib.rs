pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod plugin;
pub mod release;
pub mod swap;

pub use catalog::{fetch_catalog, CatalogEntry, CatalogFilter};
pub use config::Config;
pub use download::{download, DownloadReport};
pub use error::{Result, SnaptelError};
pub use plugin::{
    LoadedPlugin, PluginClient, PluginList, PluginSpec, RestClient, RunningPlugin, SwapOutcome,
    UnloadedPlugin,
};
pub use release::{Platform, Release, ReleaseAsset, ReleaseResolver};
pub use swap::{LoadSpec, SwapRequest, UnloadFlags, UnloadTarget};
