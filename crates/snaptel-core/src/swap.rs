//! Swap Orchestrator
//!
//! Resolves the plugin to load and the plugin to unload from command-line
//! input, then hands both to the control plane as a single swap request.
//!
//! Both sides are fully validated before the client is touched. A failed swap
//! is reported as-is: nothing here guesses which side was applied remotely and
//! no repair is attempted.

use std::path::{Path, PathBuf};

use crate::error::{Result, SnaptelError};
use crate::plugin::{PluginClient, PluginSpec, SwapOutcome};

/// Required extension of a plugin signature file
pub const SIGNATURE_EXTENSION: &str = "asc";

/// Local files submitted for loading: the plugin binary and an optional signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSpec {
    paths: Vec<PathBuf>,
}

impl LoadSpec {
    pub fn new(plugin: impl Into<PathBuf>, signature: Option<&str>) -> Result<Self> {
        let mut paths = vec![plugin.into()];

        if let Some(signature) = signature.filter(|s| !s.is_empty()) {
            let path = Path::new(signature);
            if path.extension().and_then(|e| e.to_str()) != Some(SIGNATURE_EXTENSION) {
                return Err(SnaptelError::InvalidSignature {
                    path: path.to_path_buf(),
                });
            }
            paths.push(path.to_path_buf());
        }

        Ok(Self { paths })
    }

    /// Resolve `load <plugin-path>`: exactly one positional argument
    pub fn from_args(args: &[String], signature: Option<&str>) -> Result<Self> {
        match args {
            [plugin] => Self::new(plugin, signature),
            _ => Err(SnaptelError::usage("expected exactly one plugin path")),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// The two accepted ways of naming the plugin to unload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadTarget {
    /// `type:name:version` positional token
    Token(String),
    /// `--plugin-type`, `--plugin-name`, `--plugin-version` flags
    Flags {
        plugin_type: String,
        name: String,
        version: i64,
    },
}

impl UnloadTarget {
    pub fn resolve(&self) -> Result<PluginSpec> {
        match self {
            Self::Token(token) => PluginSpec::parse(token),
            Self::Flags {
                plugin_type,
                name,
                version,
            } => PluginSpec::from_parts(plugin_type.as_str(), name.as_str(), *version),
        }
    }
}

/// Values of the unload flags as given on the command line
#[derive(Debug, Clone, Default)]
pub struct UnloadFlags {
    pub plugin_type: Option<String>,
    pub name: Option<String>,
    /// `0` when the flag is omitted
    pub version: i64,
}

impl From<UnloadFlags> for UnloadTarget {
    fn from(flags: UnloadFlags) -> Self {
        Self::Flags {
            plugin_type: flags.plugin_type.unwrap_or_default(),
            name: flags.name.unwrap_or_default(),
            version: flags.version,
        }
    }
}

/// A fully validated swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub load: LoadSpec,
    pub unload: PluginSpec,
}

impl SwapRequest {
    /// Resolve `swap <plugin-path> [<type:name:version>]`.
    ///
    /// A second positional token takes precedence over the unload flags.
    pub fn from_args(args: &[String], signature: Option<&str>, flags: UnloadFlags) -> Result<Self> {
        let (plugin, target) = match args {
            [plugin] => (plugin, UnloadTarget::from(flags)),
            [plugin, token] => (plugin, UnloadTarget::Token(token.clone())),
            _ => {
                return Err(SnaptelError::usage(
                    "expected <plugin-path> and an optional <type:name:version>",
                ))
            }
        };

        let load = LoadSpec::new(plugin, signature)?;
        let unload = target.resolve()?;
        Ok(Self { load, unload })
    }
}

/// Submit the swap as one request to the control plane
pub fn swap(client: &dyn PluginClient, request: &SwapRequest) -> Result<SwapOutcome> {
    tracing::debug!(
        load = ?request.load.paths(),
        unload = %request.unload,
        "swapping plugins"
    );

    client
        .swap_plugin(request.load.paths(), &request.unload)
        .map_err(|e| match e {
            SnaptelError::Remote {
                message, detail, ..
            } => SnaptelError::SwapFailed { message, detail },
            other => SnaptelError::SwapFailed {
                message: other.to_string(),
                detail: None,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{LoadedPlugin, PluginList, UnloadedPlugin, SPEC_DELIMITER};
    use std::cell::RefCell;

    /// Records swap calls and replies with a canned result
    struct FakeClient {
        fail_with: Option<String>,
        calls: RefCell<Vec<(Vec<PathBuf>, PluginSpec)>>,
    }

    impl FakeClient {
        fn ok() -> Self {
            Self {
                fail_with: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PluginClient for FakeClient {
        fn load_plugin(&self, _paths: &[PathBuf]) -> Result<Vec<LoadedPlugin>> {
            unreachable!("swap must not issue a separate load")
        }

        fn unload_plugin(&self, _spec: &PluginSpec) -> Result<UnloadedPlugin> {
            unreachable!("swap must not issue a separate unload")
        }

        fn swap_plugin(&self, paths: &[PathBuf], spec: &PluginSpec) -> Result<SwapOutcome> {
            self.calls
                .borrow_mut()
                .push((paths.to_vec(), spec.clone()));

            if let Some(message) = &self.fail_with {
                return Err(SnaptelError::Remote {
                    operation: "swapping".to_string(),
                    message: message.clone(),
                    detail: Some("detail".to_string()),
                });
            }

            Ok(SwapOutcome {
                loaded: LoadedPlugin {
                    name: "new-plugin".to_string(),
                    version: 1,
                    plugin_type: spec.plugin_type.clone(),
                    signed: paths.len() == 2,
                    status: "loaded".to_string(),
                    loaded_timestamp: 0,
                },
                unloaded: UnloadedPlugin {
                    name: spec.name.clone(),
                    version: spec.version,
                    plugin_type: spec.plugin_type.clone(),
                },
            })
        }

        fn get_plugins(&self, _running: bool) -> Result<PluginList> {
            Ok(PluginList::default())
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn token(parts: [&str; 3]) -> String {
        parts.join(SPEC_DELIMITER.to_string().as_str())
    }

    #[test]
    fn test_load_spec_with_signature() {
        let spec = LoadSpec::new("./new.plugin", Some("./new.plugin.asc")).unwrap();
        assert_eq!(
            spec.paths(),
            &[PathBuf::from("./new.plugin"), PathBuf::from("./new.plugin.asc")]
        );
    }

    #[test]
    fn test_load_spec_empty_signature_ignored() {
        let spec = LoadSpec::new("./new.plugin", Some("")).unwrap();
        assert_eq!(spec.paths().len(), 1);
    }

    #[test]
    fn test_load_spec_rejects_non_asc_signature() {
        for bad in ["./sig.txt", "./sig", "./asc"] {
            assert!(matches!(
                LoadSpec::new("./new.plugin", Some(bad)),
                Err(SnaptelError::InvalidSignature { .. })
            ));
        }
    }

    #[test]
    fn test_load_spec_from_args_count() {
        assert!(LoadSpec::from_args(&args(&["a"]), None).is_ok());
        assert!(matches!(
            LoadSpec::from_args(&args(&[]), None),
            Err(SnaptelError::Usage { .. })
        ));
        assert!(matches!(
            LoadSpec::from_args(&args(&["a", "b"]), None),
            Err(SnaptelError::Usage { .. })
        ));
    }

    #[test]
    fn test_token_and_flags_resolve_identically() {
        let from_token = SwapRequest::from_args(
            &args(&["./new.plugin", token(["storage", "old-plugin", "1"]).as_str()]),
            None,
            UnloadFlags::default(),
        )
        .unwrap();

        let from_flags = SwapRequest::from_args(
            &args(&["./new.plugin"]),
            None,
            UnloadFlags {
                plugin_type: Some("storage".to_string()),
                name: Some("old-plugin".to_string()),
                version: 1,
            },
        )
        .unwrap();

        assert_eq!(from_token, from_flags);
    }

    #[test]
    fn test_token_wins_over_flags() {
        let request = SwapRequest::from_args(
            &args(&["./new.plugin", token(["collector", "cpu", "4"]).as_str()]),
            None,
            UnloadFlags {
                plugin_type: Some("publisher".to_string()),
                name: Some("file".to_string()),
                version: 9,
            },
        )
        .unwrap();
        assert_eq!(request.unload.name, "cpu");
    }

    #[test]
    fn test_swap_arg_count() {
        for bad in [args(&[]), args(&["a", "b", "c"])] {
            assert!(matches!(
                SwapRequest::from_args(&bad, None, UnloadFlags::default()),
                Err(SnaptelError::Usage { .. })
            ));
        }
    }

    #[test]
    fn test_missing_flags_fail_validation() {
        let err = SwapRequest::from_args(&args(&["./p"]), None, UnloadFlags::default())
            .unwrap_err();
        assert!(matches!(err, SnaptelError::MissingType));

        let err = SwapRequest::from_args(
            &args(&["./p"]),
            None,
            UnloadFlags {
                plugin_type: Some("collector".to_string()),
                name: Some("cpu".to_string()),
                version: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, SnaptelError::MissingVersion));
    }

    #[test]
    fn test_bad_signature_fails_before_unload_resolution() {
        let err = SwapRequest::from_args(
            &args(&["./p", "garbage"]),
            Some("./sig.txt"),
            UnloadFlags::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SnaptelError::InvalidSignature { .. }));
    }

    #[test]
    fn test_swap_submits_single_request() {
        let client = FakeClient::ok();
        let request = SwapRequest::from_args(
            &args(&["./new.plugin", token(["storage", "old-plugin", "1"]).as_str()]),
            Some("./new.plugin.asc"),
            UnloadFlags::default(),
        )
        .unwrap();

        let outcome = swap(&client, &request).unwrap();

        let calls = client.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.len(), 2);
        assert_eq!(calls[0].1, request.unload);
        assert!(outcome.loaded.signed);
        assert_eq!(outcome.unloaded.name, "old-plugin");
        assert_eq!(outcome.unloaded.version, 1);
    }

    #[test]
    fn test_swap_failure_is_surfaced_verbatim() {
        let client = FakeClient::failing("plugin not found");
        let request = SwapRequest {
            load: LoadSpec::new("./new.plugin", None).unwrap(),
            unload: PluginSpec::from_parts("storage", "old-plugin", 1).unwrap(),
        };

        match swap(&client, &request).unwrap_err() {
            SnaptelError::SwapFailed { message, detail } => {
                assert_eq!(message, "plugin not found");
                assert_eq!(detail.as_deref(), Some("detail"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
