//! Privacy attributes.

use std::any::Any;
use std::collections::BTreeSet;

use rating_core::{Rating, RatingError, ResolvedFacts};
use rating_engine::{
    merge_worst_with, Attribute, AttributeId, AttributeMetadata, Evaluation, ValueDetail,
};
use serde::Serialize;

use crate::{metadata, rated};

/// Third parties receiving identifying data, by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressCorrelationDetail {
    /// Entities receiving both IP address and wallet address.
    pub correlating: BTreeSet<String>,
    /// Entities receiving only one of the two.
    pub partial: BTreeSet<String>,
}

impl AddressCorrelationDetail {
    fn merge(&mut self, other: &Self) {
        self.correlating.extend(other.correlating.iter().cloned());
        self.partial.extend(other.partial.iter().cloned());
        self.partial.retain(|e| !self.correlating.contains(e));
    }
}

impl ValueDetail for AddressCorrelationDetail {
    fn tag(&self) -> &'static str {
        AddressCorrelation::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "correlating": self.correlating,
            "partial": self.partial,
        })
    }
}

/// Can a third party link the user's IP address to their wallet address?
///
/// The overall evaluation lists leaking entities from every variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCorrelation;

impl AddressCorrelation {
    /// Attribute id.
    pub const ID: &'static str = "address_correlation";
}

impl Attribute for AddressCorrelation {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Address correlation",
            "Can third parties link your IP address to your wallet address?",
            "Linking the two reveals who and where you are to anyone who sees the data.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        let Some(collection) = &facts.features.data_collection else {
            return Ok(Evaluation::unrated("Data collection has not been assessed."));
        };

        let mut detail = AddressCorrelationDetail::default();
        for leak in &collection.leaks {
            if leak.correlates() {
                detail.correlating.insert(leak.entity.clone());
            } else if leak.ip_address || leak.wallet_address {
                detail.partial.insert(leak.entity.clone());
            }
        }

        let mut evaluation = if !detail.correlating.is_empty() {
            rated(
                "ip_and_address_shared",
                Rating::Fail,
                format!(
                    "{} can link your IP address to your wallet address.",
                    join(&detail.correlating)
                ),
            )
            .with_how_to_improve(
                "Proxy RPC traffic or stop sending wallet addresses to third parties.",
            )
        } else if !detail.partial.is_empty() {
            rated(
                "partial_data_shared",
                Rating::Partial,
                format!(
                    "{} receive(s) either your IP address or your wallet address.",
                    join(&detail.partial)
                ),
            )
        } else {
            rated(
                "no_data_shared",
                Rating::Pass,
                "No third party can link your IP to your address.",
            )
        };
        evaluation.value.replace_detail(detail);
        Ok(evaluation)
    }

    fn aggregate(&self, evaluations: &[Evaluation]) -> Result<Evaluation, RatingError> {
        merge_worst_with(&self.id(), evaluations, |mut worst, others| {
            let mut merged = worst
                .value
                .detail::<AddressCorrelationDetail>()
                .cloned()
                .unwrap_or_default();
            for other in others {
                if let Some(detail) = other.value.detail::<AddressCorrelationDetail>() {
                    merged.merge(detail);
                }
            }
            worst.value.replace_detail(merged);
            worst
        })
    }
}

fn join(entities: &BTreeSet<String>) -> String {
    entities.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Does the wallet support stealth addresses and private transfers?
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionPrivacy;

impl TransactionPrivacy {
    /// Attribute id.
    pub const ID: &'static str = "transaction_privacy";
}

impl Attribute for TransactionPrivacy {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Transaction privacy",
            "Can you send and receive funds without revealing your history?",
            "Public transactions expose your balance and counterparties to everyone.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        let Some(privacy) = &facts.features.transaction_privacy else {
            return Ok(Evaluation::unrated("Transaction privacy has not been assessed."));
        };
        Ok(match (privacy.stealth_addresses, privacy.private_transfers) {
            (true, true) => rated(
                "stealth_and_private_transfers",
                Rating::Pass,
                "Supports stealth addresses and private transfers.",
            ),
            (true, false) => rated(
                "stealth_addresses_only",
                Rating::Partial,
                "Supports stealth addresses, but not private transfers.",
            ),
            (false, true) => rated(
                "private_transfers_only",
                Rating::Partial,
                "Supports private transfers, but not stealth addresses.",
            ),
            (false, false) => rated(
                "no_transaction_privacy",
                Rating::Fail,
                "All transactions are public.",
            )
            .with_how_to_improve("Add stealth address (ERC-5564) support."),
        })
    }
}
