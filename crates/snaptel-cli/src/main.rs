use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use snaptel_core::catalog::{self, CatalogFilter};
use snaptel_core::config::Config;
use snaptel_core::download::{self, target_path};
use snaptel_core::http;
use snaptel_core::swap::{self, LoadSpec, SwapRequest, UnloadFlags};
use snaptel_core::{
    Platform, PluginClient, PluginSpec, ReleaseResolver, RestClient, Result, SnaptelError,
};

mod args;
mod render;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let command_name = cli.command.as_ref().map(Commands::name);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            if e.is_usage() {
                print_usage(command_name);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_usage(command_name: Option<&str>) {
    let mut cmd = Cli::command();
    cmd.build();
    let usage = match command_name.and_then(|name| cmd.find_subcommand_mut(name)) {
        Some(sub) => sub.render_usage(),
        None => cmd.render_usage(),
    };
    eprintln!("{}", usage);
}

fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().write_help(out)?;
        return Ok(());
    };

    // Commands below this match read the config file; these do not
    match command {
        Commands::Completions { shell } => {
            handle_completions(shell);
            return Ok(());
        }
        Commands::Download { url, output } => {
            return handle_download(&url, output.as_deref(), out);
        }
        Commands::Config { action } => {
            let base_dir = resolve_base_dir(cli.base_dir)?;
            return handle_config(action, &base_dir, out);
        }
        _ => {}
    }

    let base_dir = resolve_base_dir(cli.base_dir)?;
    let config = Config::load(&base_dir)?;

    match command {
        Commands::Load { args, plugin_asc } => {
            let client = plugin_client(&config, cli.url.as_deref())?;
            handle_load(&client, &args, plugin_asc.as_deref(), out)
        }
        Commands::Unload {
            plugin_type,
            name,
            version,
        } => {
            let client = plugin_client(&config, cli.url.as_deref())?;
            handle_unload(
                &client,
                plugin_type.as_deref().unwrap_or_default(),
                name.as_deref().unwrap_or_default(),
                version.as_deref().unwrap_or_default(),
                out,
            )
        }
        Commands::Swap {
            args,
            plugin_asc,
            plugin_type,
            plugin_name,
            plugin_version,
        } => {
            let flags = UnloadFlags {
                plugin_type,
                name: plugin_name,
                version: plugin_version,
            };
            let client = plugin_client(&config, cli.url.as_deref())?;
            handle_swap(&client, &args, plugin_asc.as_deref(), flags, out)
        }
        Commands::ListPlugins { running } => {
            let client = plugin_client(&config, cli.url.as_deref())?;
            handle_list_plugins(&client, running, out)
        }
        Commands::ListCatalog {
            plugin_type,
            plugin_name,
        } => handle_list_catalog(
            &config,
            CatalogFilter::new(plugin_type.as_deref(), plugin_name.as_deref()),
            out,
        ),
        Commands::ReleaseLinks { repo } => handle_release_links(&config, &repo, out),
        Commands::DownloadRelease { repo } => handle_download_release(&config, &repo, out),
        Commands::Config { .. } | Commands::Completions { .. } | Commands::Download { .. } => {
            Ok(())
        }
    }
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    match cli_base {
        Some(base) => Ok(base),
        None => Config::default_base_dir(),
    }
}

fn plugin_client(config: &Config, url: Option<&str>) -> Result<RestClient> {
    let url = url.unwrap_or(&config.client.url);
    tracing::debug!(url, "using control plane");
    RestClient::new(url, &config.client.api_version)
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "snaptel", &mut io::stdout());
}

fn handle_config<W: Write>(action: ConfigAction, base_dir: &Path, out: &mut W) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => writeln!(out, "{}", value)?,
                None => return Err(SnaptelError::ConfigKeyNotFound { key }),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            writeln!(out, "{} {} = {}", "Set:".green(), key, value)?;
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            for (key, value) in config.list() {
                writeln!(out, "{} = {}", key.cyan(), value)?;
            }
        }
        ConfigAction::Path => {
            writeln!(out, "{}", Config::path(base_dir).display())?;
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            writeln!(out, "{} {}", "Initialized:".green(), path.display())?;
        }
    }

    Ok(())
}

fn handle_load<W: Write>(
    client: &dyn PluginClient,
    args: &[String],
    plugin_asc: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let spec = LoadSpec::from_args(args, plugin_asc)?;
    let loaded = client.load_plugin(spec.paths())?;
    render::write_load_result(out, &loaded)?;
    Ok(())
}

fn handle_unload<W: Write>(
    client: &dyn PluginClient,
    plugin_type: &str,
    name: &str,
    version: &str,
    out: &mut W,
) -> Result<()> {
    let spec = PluginSpec::from_args(plugin_type, name, version)?;
    let unloaded = client.unload_plugin(&spec)?;
    render::write_unloaded(out, &unloaded)?;
    Ok(())
}

fn handle_swap<W: Write>(
    client: &dyn PluginClient,
    args: &[String],
    plugin_asc: Option<&str>,
    flags: UnloadFlags,
    out: &mut W,
) -> Result<()> {
    let request = SwapRequest::from_args(args, plugin_asc, flags)?;
    let outcome = swap::swap(client, &request)?;
    render::write_swap(out, &outcome)?;
    Ok(())
}

fn handle_list_plugins<W: Write>(
    client: &dyn PluginClient,
    running: bool,
    out: &mut W,
) -> Result<()> {
    let list = client.get_plugins(running)?;
    render::write_plugin_list(out, &list, running)?;
    Ok(())
}

fn handle_list_catalog<W: Write>(config: &Config, filter: CatalogFilter, out: &mut W) -> Result<()> {
    let client = http::build_client()?;
    let entries = catalog::fetch_catalog(&client, &config.catalog.url)?;
    let matching = filter.apply(&entries);
    writeln!(out, "{}", catalog::to_pretty_json(&matching)?)?;
    Ok(())
}

fn handle_download<W: Write>(url: &str, output: Option<&str>, out: &mut W) -> Result<()> {
    let client = http::build_client()?;
    fetch_to_file(&client, url, output, out)
}

fn handle_release_links<W: Write>(config: &Config, repo: &str, out: &mut W) -> Result<()> {
    let client = http::build_client()?;
    let release = ReleaseResolver::new(&client, &config.release).latest(repo)?;
    for url in release.download_urls() {
        writeln!(out, "{}", url)?;
    }
    Ok(())
}

fn handle_download_release<W: Write>(config: &Config, repo: &str, out: &mut W) -> Result<()> {
    let client = http::build_client()?;
    let resolver = ReleaseResolver::new(&client, &config.release);
    let release = resolver.latest(repo)?;
    let url = resolver.asset_url(repo, &release, &Platform::current())?;
    fetch_to_file(&client, &url, Some(repo), out)
}

fn fetch_to_file<W: Write>(
    client: &http::Client,
    url: &str,
    name: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let target = target_path(Path::new(""), url, name);
    writeln!(out, "Downloading {} to {}", url, target.display())?;
    let report = download::download(client, url, &target)?;
    writeln!(out, "{} bytes downloaded.", report.bytes)?;
    Ok(())
}
