//! Plugin identity parsing
//!
//! A plugin is addressed by its `(type, name, version)` triple. Commands accept
//! the triple either as one delimited token (`collector:cpu:3`) or as three
//! separate values.

use std::fmt;

use crate::error::{Result, SnaptelError};

/// Separator used by the single-token form (the platform path-list delimiter)
#[cfg(windows)]
pub const SPEC_DELIMITER: char = ';';
#[cfg(not(windows))]
pub const SPEC_DELIMITER: char = ':';

/// Identity of a loaded or loadable plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    pub plugin_type: String,
    pub name: String,
    pub version: i64,
}

impl PluginSpec {
    /// Build from discrete values whose version is already an integer.
    ///
    /// A version of `0` is rejected as missing: an omitted `--plugin-version`
    /// flag and an explicit zero are indistinguishable here.
    pub fn from_parts(
        plugin_type: impl Into<String>,
        name: impl Into<String>,
        version: i64,
    ) -> Result<Self> {
        let spec = Self {
            plugin_type: plugin_type.into(),
            name: name.into(),
            version,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Build from positional text values (`unload <type> <name> <version>`)
    pub fn from_args(plugin_type: &str, name: &str, version: &str) -> Result<Self> {
        if plugin_type.is_empty() {
            return Err(SnaptelError::MissingType);
        }
        if name.is_empty() {
            return Err(SnaptelError::MissingName);
        }
        let version = parse_version(version)?;
        Self::from_parts(plugin_type, name, version)
    }

    /// Parse the single-token form, e.g. `collector:cpu:3`
    pub fn parse(token: &str) -> Result<Self> {
        let segments: Vec<&str> = if token.is_empty() {
            Vec::new()
        } else {
            token.split(SPEC_DELIMITER).collect()
        };

        match segments.as_slice() {
            [plugin_type, name, version] => {
                let version = parse_version(version)?;
                Self::from_parts(*plugin_type, *name, version)
            }
            _ => Err(SnaptelError::MissingSegments {
                token: token.to_string(),
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.plugin_type.is_empty() {
            return Err(SnaptelError::MissingType);
        }
        if self.name.is_empty() {
            return Err(SnaptelError::MissingName);
        }
        if self.version < 1 {
            return Err(SnaptelError::MissingVersion);
        }
        Ok(())
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}",
            self.plugin_type,
            self.name,
            self.version,
            d = SPEC_DELIMITER
        )
    }
}

fn parse_version(value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| SnaptelError::InvalidVersion {
            value: value.to_string(),
        })
}
