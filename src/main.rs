//! bower-gate - boot-time Bower dependency installs
//!
//! CLI entry point that dispatches to subcommands.

use bower_gate::cli::{Cli, Commands, LogFormat};
use bower_gate::config::ConfigManager;
use bower_gate::error::{GateError, GateResult};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, format: LogFormat) {
    // 0 = info (installer output), 1 = debug, 2+ = trace
    let filter = match verbose {
        0 => EnvFilter::new("bower_gate=info"),
        1 => EnvFilter::new("bower_gate=debug"),
        _ => EnvFilter::new("bower_gate=trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.without_time().init(),
    }
}

async fn run() -> GateResult<ExitCode> {
    let cli = Cli::parse();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        bower_gate::cli::commands::completions(args);
        return Ok(ExitCode::SUCCESS);
    }

    let cwd =
        std::env::current_dir().map_err(|e| GateError::io("getting current directory", e))?;
    let manager = ConfigManager::discover(cli.config.clone(), &cwd);
    let config = manager.load().await?;

    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    init_logging(cli.verbose, format);
    tracing::debug!("Using config {}", manager.path().display());

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Boot => bower_gate::cli::commands::boot(&config).await?,
        Commands::Check(args) => {
            let install_needed = bower_gate::cli::commands::check(&config).await?;
            if args.exit_code && install_needed {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Fingerprint => bower_gate::cli::commands::fingerprint(&config)?,
        Commands::Reset => bower_gate::cli::commands::reset(&config).await?,
        Commands::Config(args) => bower_gate::cli::commands::config(args, &config, &manager)?,
    }

    Ok(ExitCode::SUCCESS)
}
