//! Self-sovereignty attributes. Both are exempt on hardware variants.

use rating_core::{Rating, RatingError, ResolvedFacts, Variant};
use rating_engine::{Attribute, AttributeId, AttributeMetadata, Evaluation};

use crate::{metadata, rated};

/// Can the user point the wallet at their own node?
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfHostedNode;

impl SelfHostedNode {
    /// Attribute id.
    pub const ID: &'static str = "self_hosted_node";
}

impl Attribute for SelfHostedNode {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Self-hosted node",
            "Can you use the wallet with your own node?",
            "Your own node cannot censor your transactions or log your activity.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        if facts.variant == Variant::Hardware {
            return Ok(Evaluation::exempt("Hardware signers do not connect to nodes."));
        }
        Ok(match facts.features.custom_rpc {
            None => Evaluation::unrated("Custom RPC support has not been assessed."),
            Some(true) => rated("custom_rpc", Rating::Pass, "Any RPC endpoint can be configured."),
            Some(false) => rated(
                "fixed_rpc",
                Rating::Fail,
                "The RPC endpoint cannot be changed.",
            )
            .with_how_to_improve("Let users configure their own RPC endpoint."),
        })
    }
}

/// Can the user get transactions included without the wallet's cooperation?
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionInclusion;

impl TransactionInclusion {
    /// Attribute id.
    pub const ID: &'static str = "transaction_inclusion";
}

impl Attribute for TransactionInclusion {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Transaction inclusion",
            "Can you get transactions included if the wallet's infrastructure censors you?",
            "Censorship resistance means no single operator can block your funds.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        if facts.variant == Variant::Hardware {
            return Ok(Evaluation::exempt("Hardware signers do not submit transactions."));
        }
        let Some(submission) = &facts.features.transaction_submission else {
            return Ok(Evaluation::unrated("Transaction submission has not been assessed."));
        };
        Ok(match (submission.self_broadcast, submission.l2_force_withdrawal) {
            (false, _) => rated(
                "no_self_broadcast",
                Rating::Fail,
                "Transactions can only be sent through the wallet's own infrastructure.",
            )
            .with_how_to_improve("Allow broadcasting through any node."),
            (true, Some(false)) => rated(
                "no_l2_force_withdrawal",
                Rating::Partial,
                "L1 transactions can be self-broadcast, but L2 force-withdrawal is unsupported.",
            ),
            (true, _) => rated(
                "self_broadcast",
                Rating::Pass,
                "Transactions can be broadcast through any node.",
            ),
        })
    }
}
