use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnaptelError {
    #[error("Incorrect usage: {message}")]
    Usage { message: String },

    #[error("Must provide plugin type")]
    MissingType,

    #[error("Must provide plugin name")]
    MissingName,

    #[error("Must provide plugin version")]
    MissingVersion,

    #[error("Can't convert version string to integer: '{value}'")]
    InvalidVersion { value: String },

    #[error("Missing type, name, or version in '{token}'")]
    MissingSegments { token: String },

    #[error("Must be a .asc file for the --plugin-asc flag: {path}")]
    InvalidSignature { path: PathBuf },

    #[error("Error {operation} plugin:\n{message}{}", detail_suffix(.detail))]
    Remote {
        operation: String,
        message: String,
        detail: Option<String>,
    },

    #[error(
        "Error swapping plugins (remote state unknown: the load or the unload may have been applied):\n{message}{}",
        detail_suffix(.detail)
    )]
    SwapFailed {
        message: String,
        detail: Option<String>,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned {status}")]
    BadStatus { url: String, status: u16 },

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Malformed release document: {reason}")]
    MalformedRelease { reason: String },

    #[error("Architecture '{arch}' is not yet supported")]
    UnsupportedArchitecture { arch: String },

    #[error("Error while creating {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while downloading {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Error while writing {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, SnaptelError>;

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!("\n{}", d),
        None => String::new(),
    }
}

impl SnaptelError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Errors raised while resolving command-line input, before any request is sent.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::Usage { .. }
                | Self::MissingType
                | Self::MissingName
                | Self::MissingVersion
                | Self::InvalidVersion { .. }
                | Self::MissingSegments { .. }
                | Self::InvalidSignature { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_usage() => 64,
            Self::Remote { .. } | Self::SwapFailed { .. } => 2,
            Self::Transport { .. } | Self::BadStatus { .. } | Self::InvalidResponse { .. } => 3,
            Self::MalformedRelease { .. } | Self::UnsupportedArchitecture { .. } => 4,
            Self::CreateFailed { .. } | Self::FetchFailed { .. } | Self::WriteFailed { .. } => 5,
            _ => 1,
        }
    }
}
