//! Ecosystem integration attributes.

use rating_core::{Rating, RatingError, ResolvedFacts, Variant};
use rating_engine::{Attribute, AttributeId, AttributeMetadata, Evaluation};

use crate::{metadata, rated};

/// Does the browser extension implement the standard provider APIs?
///
/// Exempt on every variant but `browser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserIntegration;

impl BrowserIntegration {
    /// Attribute id.
    pub const ID: &'static str = "browser_integration";
}

impl Attribute for BrowserIntegration {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Browser integration",
            "Does the extension support EIP-1193 and EIP-6963?",
            "Standard provider APIs let you use several wallets side by side without conflicts.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        if facts.variant != Variant::Browser {
            return Ok(Evaluation::exempt("Only browser extensions inject a provider."));
        }
        let Some(provider) = &facts.features.browser_provider else {
            return Ok(Evaluation::unrated("Browser provider support has not been assessed."));
        };
        Ok(match (provider.eip1193, provider.eip6963) {
            (true, true) => rated(
                "eip1193_and_eip6963",
                Rating::Pass,
                "Implements EIP-1193 with EIP-6963 discovery.",
            ),
            (true, false) => rated(
                "eip1193_only",
                Rating::Partial,
                "Implements EIP-1193 but not EIP-6963 discovery.",
            )
            .with_how_to_improve("Announce the provider with EIP-6963."),
            (false, _) => rated(
                "no_standard_provider",
                Rating::Fail,
                "Does not implement the EIP-1193 provider API.",
            ),
        })
    }
}
