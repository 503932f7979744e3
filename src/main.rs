use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod coordinator;
mod delegation;
mod session;

use cli::{Cli, Commands, OutputFormat};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("delegator")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("delegator.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Route {
            task,
            input_type,
            format,
        } => commands::route::run(
            &task.join(" "),
            &input_type,
            OutputFormat::resolve(format),
            cli.verbose,
            &config,
        ),
        Commands::Analyze { task, format } => {
            commands::analyze::run(&task.join(" "), OutputFormat::resolve(format), &config)
        }
        Commands::Batch {
            file,
            input_type,
            format,
        } => commands::batch::run(
            file.as_deref(),
            &input_type,
            OutputFormat::resolve(format),
            cli.quiet,
            &config,
        ),
        Commands::Demo => commands::demo::run(cli.quiet, &config),
        Commands::Rules { format } => commands::rules::run(OutputFormat::resolve(format), &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Completions need no rule set
    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run(shell);
    }

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting delegator with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
