//! recreport CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use recreport_cli::cli::Cli;
use recreport_cli::commands;
use recreport_cli::config::ReportConfig;
use recreport_cli::error::{CliError, CliResult};
use recreport_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    // Run the report
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let mut config = if let Some(ref path) = cli.config {
        ReportConfig::load_from(path).map_err(CliError::Config)?
    } else {
        ReportConfig::load().map_err(CliError::Config)?
    };
    config.apply_cli(&cli);

    commands::report::run(&config).await
}
