//! Shared blocking HTTP plumbing for the catalog, release and download endpoints

use reqwest::blocking::Response;
use serde::de::DeserializeOwned;

pub use reqwest::blocking::Client;

use crate::error::{Result, SnaptelError};

pub const USER_AGENT: &str = concat!("snaptel/", env!("CARGO_PKG_VERSION"));

/// Build the blocking client used for every outbound request.
///
/// Source-hosting APIs reject requests without a `User-Agent`.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| SnaptelError::Transport {
            url: String::new(),
            source,
        })
}

/// Single-attempt GET that fails on transport errors and non-success statuses
pub fn get(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!(url, "GET");
    let response = client
        .get(url)
        .send()
        .map_err(|source| SnaptelError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SnaptelError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// GET and decode a JSON body
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let body = get(client, url)?
        .text()
        .map_err(|source| SnaptelError::Transport {
            url: url.to_string(),
            source,
        })?;

    serde_json::from_str(&body).map_err(|e| SnaptelError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
