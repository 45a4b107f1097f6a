//! Plugin management client
//!
//! `PluginClient` is the surface of the control plane that commands depend on.
//! `RestClient` implements it over the control plane's REST API.

use std::collections::HashMap;
use std::path::PathBuf;

use reqwest::blocking::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Result, SnaptelError};
use crate::http;
use crate::plugin::spec::PluginSpec;
use crate::plugin::types::{LoadedPlugin, PluginList, SwapOutcome, UnloadedPlugin};

/// Load/unload/swap/list surface of the control plane
pub trait PluginClient {
    /// Load a plugin binary, optionally with its signature file
    fn load_plugin(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPlugin>>;

    fn unload_plugin(&self, spec: &PluginSpec) -> Result<UnloadedPlugin>;

    /// Load `paths` and unload `spec` as one request.
    ///
    /// `Ok` means both sides completed. An error says nothing about which side,
    /// if any, was applied.
    fn swap_plugin(&self, paths: &[PathBuf], spec: &PluginSpec) -> Result<SwapOutcome>;

    fn get_plugins(&self, running: bool) -> Result<PluginList>;
}

/// Response envelope used by every control plane endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    body: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LoadBody {
    #[serde(default)]
    loaded_plugins: Vec<LoadedPlugin>,
}

/// Control plane client over HTTP
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    /// Create a client for `url` (e.g. `http://localhost:8181`) and API version (e.g. `v1`)
    pub fn new(url: &str, api_version: &str) -> Result<Self> {
        Ok(Self {
            http: http::build_client()?,
            base_url: format!("{}/{}", url.trim_end_matches('/'), api_version),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn plugins_url(&self) -> String {
        format!("{}/plugins", self.base_url)
    }

    /// Send a request and decode the envelope body, mapping failures to `Remote`
    fn call<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        let remote = |message: String, detail: Option<String>| SnaptelError::Remote {
            operation: operation.to_string(),
            message,
            detail,
        };

        let response = request.send().map_err(|e| remote(e.to_string(), None))?;
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().map_err(|e| remote(e.to_string(), None))?;

        if !status.is_success() {
            tracing::debug!(%url, %status, "control plane returned an error");
            return Err(match parse_error_body(&text) {
                Some(body) => {
                    let detail = body.fields.get("error").map(field_to_string);
                    remote(body.message, detail)
                }
                None => remote(format!("{}: {}", status, text.trim()), None),
            });
        }

        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|e| SnaptelError::InvalidResponse {
                url: url.clone(),
                message: e.to_string(),
            })?;
        serde_json::from_value(envelope.body).map_err(|e| SnaptelError::InvalidResponse {
            url,
            message: e.to_string(),
        })
    }
}

fn parse_error_body(text: &str) -> Option<ErrorBody> {
    let envelope: Envelope = serde_json::from_str(text).ok()?;
    serde_json::from_value(envelope.body).ok()
}

fn field_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl PluginClient for RestClient {
    fn load_plugin(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPlugin>> {
        let mut form = multipart::Form::new();
        for path in paths {
            form = form
                .file("plugin", path)
                .map_err(|e| SnaptelError::Remote {
                    operation: "loading".to_string(),
                    message: format!("unable to read {}: {}", path.display(), e),
                    detail: None,
                })?;
        }

        let url = self.plugins_url();
        tracing::debug!(%url, count = paths.len(), "POST plugin");
        let body: LoadBody = self.call("loading", self.http.post(&url).multipart(form))?;
        Ok(body.loaded_plugins)
    }

    fn unload_plugin(&self, spec: &PluginSpec) -> Result<UnloadedPlugin> {
        let url = format!(
            "{}/{}/{}/{}",
            self.plugins_url(),
            spec.plugin_type,
            spec.name,
            spec.version
        );
        tracing::debug!(%url, "DELETE plugin");
        self.call("unloading", self.http.delete(&url))
    }

    /// Issues the load, then the unload. A failed unload does not roll back the load.
    fn swap_plugin(&self, paths: &[PathBuf], spec: &PluginSpec) -> Result<SwapOutcome> {
        let loaded = self
            .load_plugin(paths)?
            .into_iter()
            .next()
            .ok_or_else(|| SnaptelError::Remote {
                operation: "swapping".to_string(),
                message: "control plane reported no loaded plugin".to_string(),
                detail: None,
            })?;

        let unloaded = self.unload_plugin(spec).map_err(|e| match e {
            SnaptelError::Remote {
                message, detail, ..
            } => SnaptelError::Remote {
                operation: "swapping".to_string(),
                message: format!(
                    "{} (plugin {} version {} remains loaded)",
                    message, loaded.name, loaded.version
                ),
                detail,
            },
            other => other,
        })?;

        Ok(SwapOutcome { loaded, unloaded })
    }

    fn get_plugins(&self, running: bool) -> Result<PluginList> {
        let mut url = self.plugins_url();
        if running {
            url.push_str("?running");
        }
        tracing::debug!(%url, "GET plugins");
        self.call("listing", self.http.get(&url))
    }
}
