//! Crawl-Watch main entry point
//!
//! This is the command-line interface: it submits a crawl to the backend,
//! follows the task until it finishes, and prints the result.

use clap::Parser;
use crawl_watch::config::{load_config_with_hash, validate, Config};
use crawl_watch::orchestrator::{Orchestrator, PollSettings, TaskSnapshot};
use crawl_watch::output::{describe_snapshot, print_result, render_json, write_markdown_summary};
use crawl_watch::{HttpTaskClient, TaskSeed, WatchError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Crawl-Watch: start a crawl on the backend and follow it to completion
///
/// The seed URL is validated locally, submitted to the crawl service, and
/// the task status is polled on a fixed interval until it completes or fails.
#[derive(Parser, Debug)]
#[command(name = "crawl-watch")]
#[command(version)]
#[command(about = "Start a backend crawl and follow it to completion", long_about = None)]
struct Cli {
    /// URL to start crawling from (scheme optional, http/https only)
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the poll interval (milliseconds)
    #[arg(long, value_name = "MS")]
    poll_interval: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write a markdown summary of a completed crawl to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Validate the seed and config, show the settings, and exit
    #[arg(long, conflicts_with_all = ["json", "summary"])]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_watch=info,warn"),
            1 => EnvFilter::new("crawl_watch=debug,info"),
            2 => EnvFilter::new("crawl_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, WatchError> {
    let config = load_effective_config(&cli)?;
    let seed = TaskSeed::parse(&cli.seed)?;

    if cli.dry_run {
        handle_dry_run(&config, &seed);
        return Ok(ExitCode::SUCCESS);
    }

    let client = HttpTaskClient::new(&config.backend)?;
    tracing::debug!("Using backend at {}", client.base_url());
    let orchestrator = Orchestrator::new(client, PollSettings::from(&config.poller));

    let final_snapshot = match follow(&orchestrator, &cli.seed).await? {
        Some(snapshot) => snapshot,
        None => {
            tracing::warn!("Interrupted; task abandoned");
            return Ok(ExitCode::from(130));
        }
    };

    report(&cli, &final_snapshot)
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, WatchError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(interval) = cli.poll_interval {
        config.poller.poll_interval_ms = interval;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be submitted
fn handle_dry_run(config: &Config, seed: &TaskSeed) {
    println!("=== Crawl-Watch Dry Run ===\n");

    println!("Seed:");
    println!("  Input: {}", seed);
    match seed.to_url() {
        Ok(url) => println!("  Resolved: {}", url),
        Err(e) => println!("  Resolved: <{}>", e),
    }

    println!("\nBackend:");
    println!("  Base URL: {}", config.backend.base_url);
    println!("  Request timeout: {}s", config.backend.request_timeout_secs);
    println!("  Connect timeout: {}s", config.backend.connect_timeout_secs);
    println!("  User agent: {}", config.backend.user_agent);

    println!("\nPoller:");
    println!("  Poll interval: {}ms", config.poller.poll_interval_ms);
    if config.poller.max_polls > 0 {
        println!("  Max polls: {}", config.poller.max_polls);
    } else {
        println!("  Max polls: unlimited");
    }

    println!("\n✓ Seed and configuration are valid");
}

/// Starts the task and logs every snapshot until a terminal one arrives
///
/// Returns `None` if interrupted with Ctrl-C.
async fn follow(
    orchestrator: &Orchestrator<HttpTaskClient>,
    input: &str,
) -> Result<Option<TaskSnapshot>, WatchError> {
    let mut rx = orchestrator.subscribe();
    orchestrator.start(input)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                orchestrator.stop();
                return Ok(None);
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(Some(orchestrator.snapshot()));
                }

                let snapshot = rx.borrow_and_update().clone();
                tracing::info!("{}", describe_snapshot(&snapshot));

                if snapshot.is_terminal() {
                    return Ok(Some(snapshot));
                }
            }
        }
    }
}

/// Prints the final snapshot and picks the exit code
fn report(cli: &Cli, snapshot: &TaskSnapshot) -> Result<ExitCode, WatchError> {
    if cli.json {
        println!("{}", render_json(snapshot)?);
    }

    match snapshot {
        TaskSnapshot::Completed { handle, result } => {
            if !cli.json {
                print_result(handle, result);
            }
            if let Some(path) = &cli.summary {
                write_markdown_summary(handle, result, path)?;
                tracing::info!("Summary written to: {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        other => {
            if !cli.json {
                eprintln!("{}", describe_snapshot(other));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
