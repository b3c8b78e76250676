//! Report rendering for `wrate rate`.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use rating_engine::{GroupScore, RatedWallet};
use serde::Serialize;

/// A document the engine refused to rate.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedDocument {
    /// Path of the fact document.
    pub path: String,
    /// The engine error, with its context chain.
    pub error: String,
}

/// The JSON report envelope.
#[derive(Debug, Serialize)]
pub struct RateReport<'a> {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Version of the tool that produced the report.
    pub engine_version: &'static str,
    /// Successfully rated wallets, in input order.
    pub wallets: Vec<&'a RatedWallet>,
    /// Documents that failed to rate.
    pub rejected: Vec<RejectedDocument>,
}

impl<'a> RateReport<'a> {
    /// Wrap rated wallets in an envelope stamped with the current time.
    pub fn new(wallets: Vec<&'a RatedWallet>, rejected: Vec<RejectedDocument>) -> Self {
        Self {
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION"),
            wallets,
            rejected,
        }
    }
}

/// Render one rated wallet as text.
///
/// ```text
/// Rabby (rabby) [generic] browser, desktop
///   facts sha256:...
///   groups
///     security          0.67
///     privacy           0.50  (unrated components)
///     ecosystem         unrated
///   attributes
///     chain_verification      PASS     browser=ALL_SAME desktop=ALL_SAME
///   ladders
///     software_stages   stage 1 (stage_1)
/// ```
pub fn render_text(out: &mut impl Write, wallet: &RatedWallet) -> io::Result<()> {
    let metadata = wallet.metadata();
    let variants: Vec<&str> = wallet.variants().map(|v| v.as_str()).collect();
    writeln!(
        out,
        "{} ({}) [{}] {}",
        metadata.display_name,
        metadata.id,
        wallet.profile(),
        variants.join(", ")
    )?;
    writeln!(out, "  facts {}", wallet.facts_digest())?;

    writeln!(out, "  groups")?;
    for group in wallet.group_scores() {
        match group.score {
            Some(GroupScore {
                score: Some(score),
                has_unrated_component: true,
            }) => writeln!(
                out,
                "    {:<18}{score:.2}  (unrated components)",
                group.group
            )?,
            Some(GroupScore {
                score: Some(score),
                ..
            }) => writeln!(out, "    {:<18}{score:.2}", group.group)?,
            Some(GroupScore { score: None, .. }) => {
                writeln!(out, "    {:<18}unrated", group.group)?
            }
            None => writeln!(out, "    {:<18}n/a", group.group)?,
        }
    }

    writeln!(out, "  attributes")?;
    for (_, evaluated) in wallet.overall().attributes() {
        let id = evaluated.attribute.as_str();
        let mut line = format!("    {:<24}{:<9}", id, evaluated.evaluation.rating().as_str());
        if wallet.variants().count() > 1 {
            for variant in wallet.variants() {
                if let Ok(specificity) = wallet.specificity(variant, id) {
                    line.push_str(&format!(" {variant}={specificity}"));
                }
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    let mut ladders = wallet.ladder_reports().peekable();
    if ladders.peek().is_some() {
        writeln!(out, "  ladders")?;
        for report in ladders {
            writeln!(out, "    {:<18}{}", report.ladder, report.result)?;
        }
    }
    Ok(())
}
