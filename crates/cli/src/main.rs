//! MedPortal CLI - command line client for the hospital management API

mod commands;
mod config;
mod console;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{App, Commands};
use crate::config::CliConfig;
use std::path::PathBuf;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "medportal")]
#[command(about = "Command line client for the MedPortal hospital API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory holding remembered credentials and the optional medportal.toml
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_state_dir = crate::config::resolve_state_dir(cli.data_dir.clone());
    let mut settings = CliConfig::load(cli.config.as_deref(), &default_state_dir)?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }
    let state_dir = cli
        .data_dir
        .or_else(|| settings.state_dir.clone())
        .unwrap_or(default_state_dir);

    logging::init_logging(cli.log_level.into(), cli.json_logs || settings.log_json)?;
    info!(
        api_url = %settings.api_url,
        state_dir = %state_dir.display(),
        "Starting MedPortal CLI"
    );

    let app = App::open(&settings, &state_dir)?;
    match cli.command.execute(&app).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
