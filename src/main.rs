use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use session_logger::commands::{log, runners, watch};
use session_logger::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SESSION_LOGGER_LOG";

#[derive(Parser)]
#[command(name = "session-logger")]
#[command(about = "Record editor activity and run saved files", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a config file (default: <config dir>/session-logger/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the activity log here instead of the documents directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session fed by JSON host events on stdin
    ///
    /// Notifications for the user are written to stdout as JSON lines.
    /// The session ends on EOF, a `shutdown` event, or Ctrl-C.
    Watch {
        /// Document that already has focus when the session starts
        #[arg(long)]
        focus: Option<PathBuf>,
    },

    /// Show the activity log
    Open,

    /// Print the activity log location
    Path,

    /// List the extension to runner table
    Runners,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(log_file) = cli.log_file {
        config.log_path = Some(log_file);
    }

    match cli.command {
        Commands::Watch { focus } => watch::execute(&config, focus),
        Commands::Open => log::open(&config),
        Commands::Path => log::path(&config),
        Commands::Runners => runners::list(&config),
    }
}
