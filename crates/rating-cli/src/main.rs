//! # wrate CLI entry point
//!
//! Parses command-line arguments, initializes logging, loads the optional
//! config file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rating_cli::attributes::{run_attributes, AttributesArgs};
use rating_cli::config::CliConfig;
use rating_cli::rate::{run_rate, RateArgs};
use rating_cli::validate::{run_validate, ValidateArgs};
use rating_cli::EXIT_OPERATIONAL;

/// Comparative wallet ratings.
///
/// Rates wallet fact documents attribute by attribute across platform
/// variants, scores attribute groups, and places wallets on stage ladders.
#[derive(Parser, Debug)]
#[command(name = "wrate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rate wallet fact documents and print a report.
    Rate(RateArgs),

    /// Check fact documents without rating them.
    Validate(ValidateArgs),

    /// List the attribute registry.
    Attributes(AttributesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "wrate starting");

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_OPERATIONAL);
        }
    };

    let result = match cli.command {
        Commands::Rate(args) => run_rate(&args, &config),
        Commands::Validate(args) => run_validate(&args),
        Commands::Attributes(args) => run_attributes(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
