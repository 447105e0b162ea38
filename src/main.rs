//! ghstats - GitHub Activity Analyzer
//!
//! A CLI tool that looks up a GitHub user, aggregates their public
//! repositories and prints a small dashboard: profile, total stars,
//! top languages and top repositories.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (user not found, request failed, timeout, config, I/O)

mod analysis;
mod cli;
mod config;
mod github;
mod models;
mod report;
mod session;
mod state;

#[cfg(test)]
mod testing;

use anyhow::{bail, Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use github::{ClientConfig, GitHubClient};
use indicatif::{ProgressBar, ProgressStyle};
use models::Dashboard;
use session::{Session, ViewState};
use state::{default_state_dir, FileStore, KeyValueStore, MemoryStore, LAST_IDENTITY_KEY};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("ghstats v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "username={:?} format={:?} output={:?} no_save={}",
        args.username, args.format, args.output, args.no_save
    );

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("ghstats failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ghstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging. `RUST_LOG` overrides the verbosity flags.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load configuration, build the client and pick the state store.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let client = GitHubClient::new(ClientConfig::from(&config.api))
        .context("Failed to create GitHub client")?;
    info!(
        "API: {} (timeout {}ms)",
        client.config().base_url,
        config.api.timeout_ms
    );

    let state_dir = config.state.dir.clone().unwrap_or_else(default_state_dir);
    let file_store = FileStore::new(state_dir);
    debug!("State directory: {}", file_store.dir().display());

    if args.no_save {
        // Still recall the last username, but never write it back.
        let mut memory = MemoryStore::new();
        match file_store.get(LAST_IDENTITY_KEY) {
            Ok(Some(last)) => memory.set(LAST_IDENTITY_KEY, &last)?,
            Ok(None) => {}
            Err(e) => warn!("Failed to read saved username: {}", e),
        }
        run_session(Session::new(client, memory), &args, &config).await
    } else {
        run_session(Session::new(client, file_store), &args, &config).await
    }
}

/// Resolve the username, run one query and emit the result.
async fn run_session<S: KeyValueStore>(
    mut session: Session<S>,
    args: &Args,
    config: &Config,
) -> Result<i32> {
    let identity = match args.username.clone() {
        Some(username) => username,
        None => match session.saved_identity() {
            Some(saved) => {
                info!("Using last searched username: {}", saved);
                saved
            }
            None => bail!("No username given and none saved from a previous search. Usage: ghstats <USERNAME>"),
        },
    };

    if !session.begin(&identity) {
        bail!("Username must not be empty");
    }

    let format = config.report.format;
    let spinner = match session.state() {
        ViewState::Loading { identity } if !args.quiet && format != OutputFormat::Json => {
            Some(start_spinner(identity))
        }
        _ => None,
    };

    let state = session.complete().await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if let Some(dashboard) = state.dashboard() {
        let output = render(dashboard, format)?;
        write_output(args.output.as_deref(), &output)?;
        return Ok(0);
    }

    if let Some(e) = state.error() {
        if let Some(status) = e.status() {
            debug!("Upstream status: {}", status);
        }
        eprintln!("❌ {}", e);
        return Ok(1);
    }

    bail!("Query ended in unexpected state: {}", state)
}

fn start_spinner(identity: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analyzing {}...", identity));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn render(dashboard: &Dashboard, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report::generate_text_report(dashboard),
        OutputFormat::Markdown => report::generate_markdown_report(dashboard),
        OutputFormat::Json => report::generate_json_report(dashboard)?,
    })
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
