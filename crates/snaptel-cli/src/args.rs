use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "snaptel")]
#[command(about = "Administer plugins of a telemetry collector")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control plane URL (default: client.url from config)
    #[arg(short, long, global = true, env = "SNAPTEL_URL")]
    pub url: Option<String>,

    /// Base directory (default: ~/.snaptel)
    #[arg(long, global = true, env = "SNAPTEL_BASE")]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a plugin
    Load {
        /// Plugin binary to load
        #[arg(value_name = "PLUGIN_PATH")]
        args: Vec<String>,

        /// Signature file (.asc) for the plugin
        #[arg(short = 'a', long, value_name = "SIG_PATH")]
        plugin_asc: Option<String>,
    },

    /// Unload a plugin
    Unload {
        /// Plugin type (collector, processor, publisher, ...)
        #[arg(value_name = "TYPE")]
        plugin_type: Option<String>,

        /// Plugin name
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Plugin version
        #[arg(value_name = "VERSION")]
        version: Option<String>,
    },

    /// Load a plugin and unload another in one request
    Swap {
        /// Plugin binary to load, optionally followed by <type:name:version> to unload
        #[arg(value_name = "PLUGIN_PATH")]
        args: Vec<String>,

        /// Signature file (.asc) for the plugin to load
        #[arg(short = 'a', long, value_name = "SIG_PATH")]
        plugin_asc: Option<String>,

        /// Type of the plugin to unload
        #[arg(short = 't', long, value_name = "TYPE")]
        plugin_type: Option<String>,

        /// Name of the plugin to unload
        #[arg(short = 'n', long, value_name = "NAME")]
        plugin_name: Option<String>,

        /// Version of the plugin to unload
        #[arg(long, value_name = "VERSION", default_value_t = 0, allow_negative_numbers = true)]
        plugin_version: i64,
    },

    /// List loaded plugins
    ListPlugins {
        /// List running plugin instances instead
        #[arg(short, long)]
        running: bool,
    },

    /// List plugins published in the public catalog
    ListCatalog {
        /// Filter by plugin type (substring)
        #[arg(short = 't', long, value_name = "TYPE")]
        plugin_type: Option<String>,

        /// Filter by plugin name (substring of name or full name)
        #[arg(short = 'n', long, value_name = "NAME")]
        plugin_name: Option<String>,
    },

    /// Download a file to the current directory
    Download {
        /// URL to download
        url: String,

        /// Output file name (default: last segment of the URL)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List asset links of the latest release of a plugin repository
    ReleaseLinks {
        /// Plugin repository name (e.g., snap-plugin-collector-cpu)
        repo: String,
    },

    /// Download the latest release of a plugin for this platform
    DownloadRelease {
        /// Plugin repository name (e.g., snap-plugin-collector-cpu)
        repo: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Unload { .. } => "unload",
            Self::Swap { .. } => "swap",
            Self::ListPlugins { .. } => "list-plugins",
            Self::ListCatalog { .. } => "list-catalog",
            Self::Download { .. } => "download",
            Self::ReleaseLinks { .. } => "release-links",
            Self::DownloadRelease { .. } => "download-release",
            Self::Config { .. } => "config",
            Self::Completions { .. } => "completions",
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., client.url)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., client.url)
        key: String,

        /// Value to set (e.g., "http://10.0.0.5:8181")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
