//! # rating-catalog: Reference Attributes and Ladders
//!
//! A small catalog of concrete [`Attribute`](rating_engine::Attribute)
//! implementations and two stage ladders, built on the `rating-engine`
//! contract.
//!
//! | Group | Attributes |
//! |-------|------------|
//! | `security` | [`ChainVerification`], [`HardwareWalletSupport`], [`SecurityAudits`] |
//! | `privacy` | [`AddressCorrelation`], [`TransactionPrivacy`] |
//! | `self_sovereignty` | [`SelfHostedNode`], [`TransactionInclusion`] |
//! | `transparency` | [`OpenSource`], [`SourceVisibility`] |
//! | `ecosystem` | [`BrowserIntegration`] |
//!
//! Every attribute rates missing facts `Unrated` and inapplicable
//! profiles or variants `Exempt`.

pub mod ecosystem;
pub mod ladders;
pub mod privacy;
pub mod security;
pub mod sovereignty;
pub mod transparency;

use rating_core::RegistryError;
use rating_engine::{AttributeGroup, AttributeMetadata, AttributeRegistry, Evaluation, Value};

pub use ecosystem::BrowserIntegration;
pub use ladders::{default_ladders, hardware_stages, software_stages, DisclosedRepositoryCriterion};
pub use privacy::{AddressCorrelation, AddressCorrelationDetail, TransactionPrivacy};
pub use security::{ChainVerification, HardwareWalletDetail, HardwareWalletSupport, SecurityAudits};
pub use sovereignty::{SelfHostedNode, TransactionInclusion};
pub use transparency::{OpenSource, SourceVisibility};

/// The reference registry, in presentation order.
pub fn default_registry() -> Result<AttributeRegistry, RegistryError> {
    AttributeRegistry::new(vec![
        AttributeGroup::new("security", "Security")
            .with(ChainVerification, 1.0)
            .with(HardwareWalletSupport, 1.0)
            .with(SecurityAudits, 2.0),
        AttributeGroup::new("privacy", "Privacy")
            .with(AddressCorrelation, 2.0)
            .with(TransactionPrivacy, 1.0),
        AttributeGroup::new("self_sovereignty", "Self-sovereignty")
            .with(SelfHostedNode, 1.0)
            .with(TransactionInclusion, 1.0),
        AttributeGroup::new("transparency", "Transparency")
            .with(OpenSource, 1.0)
            .with(SourceVisibility, 1.0),
        AttributeGroup::new("ecosystem", "Ecosystem").with(BrowserIntegration, 1.0),
    ])
}

pub(crate) fn metadata(
    display_name: &str,
    question: &str,
    why_it_matters: &str,
) -> AttributeMetadata {
    AttributeMetadata {
        display_name: display_name.to_string(),
        question: question.to_string(),
        why_it_matters: why_it_matters.to_string(),
    }
}

pub(crate) fn rated(
    outcome: &str,
    rating: rating_core::Rating,
    short_explanation: impl Into<String>,
) -> Evaluation {
    Evaluation::new(Value::new(outcome, rating, short_explanation))
}
