//! Vigil CLI Binary
//!
//! Command-line entry point for the directory integrity monitor.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use vigil::config::MonitorConfig;
use vigil::logging::init_logging;
use vigil::monitor::{CancelToken, MonitorSession};

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Monitor a directory tree for file additions, modifications, and deletions",
    version
)]
struct Cli {
    /// Root directory to monitor
    root: Option<PathBuf>,

    /// Seconds between polling passes
    #[arg(long)]
    interval: Option<u64>,

    /// Audit log destination (CSV, created with a header if absent)
    #[arg(long)]
    report: Option<PathBuf>,

    /// TOML configuration file; CLI flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    match run(cli) {
        Ok(()) => {
            println!("\nMonitoring stopped by user.");
        }
        Err(e) => {
            error!("Monitoring failed: {:#}", e);
            eprintln!("vigil: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Interrupt received, stopping after the current pass");
        handler_token.cancel();
    })
    .context("Failed to install interrupt handler")?;

    let mut session =
        MonitorSession::new(config, cancel).context("Failed to start monitoring session")?;
    session.run().context("Monitoring session failed")?;
    Ok(())
}

/// Merge the config file (if any) with CLI flags; flags win.
fn build_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match (&cli.config, &cli.root) {
        (Some(path), _) => MonitorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        (None, Some(root)) => MonitorConfig::new(root.clone()),
        (None, None) => anyhow::bail!("A root directory or --config file is required"),
    };

    if let Some(ref root) = cli.root {
        config.root = root.clone();
    }
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    if let Some(ref report) = cli.report {
        config.report_path = report.clone();
    }

    Ok(config)
}
