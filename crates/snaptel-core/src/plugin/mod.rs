//! Plugin Module
//!
//! Plugin identities, control plane results and the client that talks to the
//! control plane.
//!
//! - `spec`: `(type, name, version)` parsing and validation
//! - `types`: load/unload/swap/list result types
//! - `client`: `PluginClient` trait and its REST implementation

pub mod client;
pub mod spec;
pub mod types;

// Re-exports
pub use client::{PluginClient, RestClient};
pub use spec::{PluginSpec, SPEC_DELIMITER};
pub use types::{LoadedPlugin, PluginList, RunningPlugin, SwapOutcome, UnloadedPlugin};
