//! `wrate attributes`: print the reference registry.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::{CliConfig, OutputFormat};
use crate::EXIT_OK;

/// Arguments for `wrate attributes`.
#[derive(Args, Debug)]
pub struct AttributesArgs {
    /// Listing format. Overrides the config file.
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct AttributeEntry<'a> {
    group: &'a str,
    attribute: &'a str,
    weight: f64,
    display_name: String,
    question: String,
}

/// Execute `wrate attributes`, writing the listing to stdout.
pub fn run_attributes(args: &AttributesArgs, config: &CliConfig) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_attributes_to(args, config, &mut out)
}

/// Execute `wrate attributes`, writing the listing to `out`.
pub fn run_attributes_to(
    args: &AttributesArgs,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<u8> {
    let registry = rating_catalog::default_registry().context("invalid reference registry")?;
    let entries: Vec<AttributeEntry<'_>> = registry
        .attributes()
        .map(|(group, weighted)| {
            let metadata = weighted.attribute().metadata();
            AttributeEntry {
                group: group.id().as_str(),
                attribute: weighted.id().as_str(),
                weight: weighted.weight(),
                display_name: metadata.display_name,
                question: metadata.question,
            }
        })
        .collect();

    match args.output.unwrap_or(config.output) {
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(
                    out,
                    "{:<18}{:<24}{:>4}  {}",
                    entry.group, entry.attribute, entry.weight, entry.question
                )?;
            }
        }
        OutputFormat::Json => {
            if config.pretty {
                serde_json::to_writer_pretty(&mut *out, &entries)?;
            } else {
                serde_json::to_writer(&mut *out, &entries)?;
            }
            writeln!(out)?;
        }
    }
    Ok(EXIT_OK)
}
