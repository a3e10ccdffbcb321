//! PGD - Plant Gene Dataset builder

use anyhow::Result;
use clap::Parser;
use pgd_common::logging::{init_logging, LogConfig, LogLevel};
use pgd_ingest::{commands, Cli};
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("pgd")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let _guard = init_logging(&log_config)?;

    if let Err(e) = commands::execute(&cli) {
        error!(error = %format!("{:#}", e), "Command failed");
        return Err(e);
    }

    info!("Done");
    Ok(())
}
