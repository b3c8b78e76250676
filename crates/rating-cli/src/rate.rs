//! # Rate Subcommand
//!
//! Rates each fact document against the reference registry and ladders.
//! A document the engine rejects is reported and skipped; the remaining
//! documents are still rated.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rating_engine::{Ladder, RatedWallet};

use crate::config::{CliConfig, OutputFormat};
use crate::report::{render_text, RateReport, RejectedDocument};
use crate::{load_facts, EXIT_OK, EXIT_REJECTED, EXIT_UNRATED};

/// Arguments for `wrate rate`.
#[derive(Args, Debug)]
pub struct RateArgs {
    /// Fact documents to rate (YAML, or JSON by `.json` extension).
    #[arg(required = true)]
    pub facts: Vec<PathBuf>,

    /// Report format. Overrides the config file.
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Pretty-print JSON output. Overrides the config file.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute `wrate rate`, writing the report to stdout.
pub fn run_rate(args: &RateArgs, config: &CliConfig) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_rate_to(args, config, &mut out)
}

/// Execute `wrate rate`, writing the report to `out`.
///
/// Returns 0 when every document rated cleanly, 1 when any document was
/// rejected, 3 when all rated but `fail_on_unrated` is set and some
/// attribute is unrated. I/O and parse failures propagate as errors.
pub fn run_rate_to(args: &RateArgs, config: &CliConfig, out: &mut impl Write) -> Result<u8> {
    let registry = rating_catalog::default_registry().context("invalid reference registry")?;
    let ladders = selected_ladders(config)?;

    let mut rated = Vec::with_capacity(args.facts.len());
    let mut rejected = Vec::new();
    for path in &args.facts {
        let facts = load_facts(path)?;
        match RatedWallet::rate(&facts, &registry, &ladders) {
            Ok(wallet) => {
                tracing::info!(
                    wallet = %wallet.metadata().id,
                    unrated = wallet.unrated_attributes().len(),
                    "rated"
                );
                rated.push(wallet);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "rating failed: {e}");
                rejected.push(RejectedDocument {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    match args.output.unwrap_or(config.output) {
        OutputFormat::Text => {
            for wallet in &rated {
                render_text(out, wallet)?;
                writeln!(out)?;
            }
            for doc in &rejected {
                writeln!(out, "REJECTED {}: {}", doc.path, doc.error)?;
            }
        }
        OutputFormat::Json => {
            let report = RateReport::new(rated.iter().collect(), rejected.clone());
            if args.pretty || config.pretty {
                serde_json::to_writer_pretty(&mut *out, &report)?;
            } else {
                serde_json::to_writer(&mut *out, &report)?;
            }
            writeln!(out)?;
        }
    }

    if !rejected.is_empty() {
        return Ok(EXIT_REJECTED);
    }
    if config.fail_on_unrated && rated.iter().any(|w| !w.unrated_attributes().is_empty()) {
        return Ok(EXIT_UNRATED);
    }
    Ok(EXIT_OK)
}

fn selected_ladders(config: &CliConfig) -> Result<Vec<Ladder>> {
    let all = rating_catalog::default_ladders().context("invalid reference ladders")?;
    if let Some(allowed) = &config.ladders {
        for id in allowed {
            if !all.iter().any(|l| l.id().as_str() == id) {
                tracing::warn!(ladder = %id, "unknown ladder in config allow-list");
            }
        }
    }
    Ok(all
        .into_iter()
        .filter(|l| config.includes_ladder(l.id()))
        .collect())
}
