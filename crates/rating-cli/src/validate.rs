//! # Validate Subcommand
//!
//! Checks fact documents against the input contract without rating them:
//! non-empty id, at least one variant, profile/variant consistency, and
//! full per-variant coverage.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{load_facts, EXIT_OK, EXIT_REJECTED};

/// Arguments for `wrate validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Fact documents to check.
    #[arg(required = true)]
    pub facts: Vec<PathBuf>,
}

/// Execute `wrate validate`, writing results to stdout.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, &mut out)
}

/// Execute `wrate validate`, writing results to `out`.
///
/// Returns exit code: 0 if every document is valid, 1 if any is not.
/// Unreadable or unparsable documents propagate as errors.
pub fn run_validate_to(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let mut failures = 0usize;
    for path in &args.facts {
        let facts = load_facts(path)?;
        match facts.validate() {
            Ok(()) => {
                writeln!(out, "OK      {} ({})", path.display(), facts.metadata.id)?;
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(path = %path.display(), "invalid fact document: {e}");
                writeln!(out, "INVALID {}: {e}", path.display())?;
            }
        }
    }

    writeln!(
        out,
        "{} document(s) checked, {} invalid",
        args.facts.len(),
        failures
    )?;
    Ok(if failures == 0 { EXIT_OK } else { EXIT_REJECTED })
}
