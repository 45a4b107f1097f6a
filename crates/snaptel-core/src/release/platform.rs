//! Host platform identification for release assets
//!
//! Release artifacts are named with Go-style OS identifiers and their own
//! architecture labels (`x86_64`, `x86_32`).

use crate::error::{Result, SnaptelError};

/// Operating system and architecture, using Go runtime identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was built for
    pub fn current() -> Self {
        Self::new(
            os_id(std::env::consts::OS),
            arch_id(std::env::consts::ARCH),
        )
    }

    /// Architecture label used in artifact names
    pub fn asset_arch(&self) -> Result<&'static str> {
        match self.arch.as_str() {
            "amd64" => Ok("x86_64"),
            "386" => Ok("x86_32"),
            other => Err(SnaptelError::UnsupportedArchitecture {
                arch: other.to_string(),
            }),
        }
    }
}

fn os_id(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn arch_id(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}
