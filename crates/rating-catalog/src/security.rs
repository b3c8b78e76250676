//! Security attributes.

use std::any::Any;
use std::collections::BTreeSet;

use rating_core::{features, Rating, RatingError, ResolvedFacts, Variant, WalletProfile};
use rating_engine::{
    merge_worst_with, Attribute, AttributeId, AttributeMetadata, Evaluation, Reference, ValueDetail,
};
use serde::Serialize;

use crate::{metadata, rated};

// ---------------------------------------------------------------------------
// Chain verification
// ---------------------------------------------------------------------------

/// Does the wallet verify chain state with a light client?
///
/// Exempt on hardware variants, which do not talk to the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainVerification;

impl ChainVerification {
    /// Attribute id.
    pub const ID: &'static str = "chain_verification";
}

impl Attribute for ChainVerification {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Chain verification",
            "Does the wallet verify the chain state it displays?",
            "Without verification, the RPC provider can show you a fake balance or fake results.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        if facts.variant == Variant::Hardware {
            return Ok(Evaluation::exempt("Hardware signers do not read chain state."));
        }
        let Some(verification) = &facts.features.chain_verification else {
            return Ok(Evaluation::unrated("Chain verification has not been assessed."));
        };
        Ok(match verification.light_client {
            Some(client) => rated(
                &format!("light_client_{}", light_client_name(client)),
                Rating::Pass,
                format!("Verifies L1 state with the {} light client.", light_client_name(client)),
            ),
            None => rated(
                "no_light_client",
                Rating::Fail,
                "Trusts its RPC provider for chain state.",
            )
            .with_how_to_improve("Embed a light client such as Helios."),
        })
    }
}

fn light_client_name(client: features::LightClient) -> &'static str {
    match client {
        features::LightClient::Helios => "helios",
        features::LightClient::Nimbus => "nimbus",
        features::LightClient::Lodestar => "lodestar",
    }
}

// ---------------------------------------------------------------------------
// Hardware wallet support
// ---------------------------------------------------------------------------

/// Devices supported by a software wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareWalletDetail {
    /// Supported device families, merged across variants in the overall view.
    pub supported: BTreeSet<String>,
}

impl ValueDetail for HardwareWalletDetail {
    fn tag(&self) -> &'static str {
        HardwareWalletSupport::ID
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "supported": self.supported })
    }
}

/// Can the wallet drive hardware signers, with clear signing?
///
/// Exempt on hardware variants and for payments wallets.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareWalletSupport;

impl HardwareWalletSupport {
    /// Attribute id.
    pub const ID: &'static str = "hardware_wallet_support";
}

impl Attribute for HardwareWalletSupport {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Hardware wallet support",
            "Can the wallet sign with a hardware wallet, showing the transaction on the device?",
            "Keys on a dedicated device are out of reach of malware on your computer or phone.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        if facts.variant == Variant::Hardware {
            if facts.profile != WalletProfile::Hardware {
                tracing::warn!(
                    wallet = %facts.wallet_id(),
                    profile = %facts.profile,
                    "hardware variant evaluated under a software profile"
                );
                return Err(RatingError::InvariantViolation {
                    attribute: Self::ID.to_string(),
                    variant: facts.variant,
                    reason: format!("hardware variant on a {} wallet", facts.profile),
                });
            }
            return Ok(Evaluation::exempt("The wallet is itself a hardware signer."));
        }
        if facts.profile == WalletProfile::Payments {
            return Ok(Evaluation::exempt("Not expected of payments wallets."));
        }
        let Some(support) = &facts.features.hardware_wallets else {
            return Ok(Evaluation::unrated("Hardware wallet support has not been assessed."));
        };
        let detail = HardwareWalletDetail {
            supported: support.supported.clone(),
        };
        if support.supported.is_empty() {
            return Ok(rated(
                "no_hardware_wallets",
                Rating::Fail,
                "No hardware wallets are supported.",
            )
            .with_how_to_improve("Support at least one hardware wallet family."));
        }
        let mut evaluation = match support.clear_signing {
            Some(true) => rated(
                "clear_signing",
                Rating::Pass,
                "Supports hardware wallets with clear signing.",
            ),
            Some(false) => rated(
                "blind_signing",
                Rating::Partial,
                "Supports hardware wallets, but transactions are blind-signed.",
            )
            .with_how_to_improve("Send decodable transaction data to the device."),
            None => rated(
                "clear_signing_unknown",
                Rating::Unrated,
                "Supports hardware wallets; clear signing has not been assessed.",
            ),
        };
        evaluation.value.replace_detail(detail);
        Ok(evaluation)
    }

    fn aggregate(&self, evaluations: &[Evaluation]) -> Result<Evaluation, RatingError> {
        merge_worst_with(&self.id(), evaluations, |mut worst, others| {
            let mut supported = worst
                .value
                .detail::<HardwareWalletDetail>()
                .map(|d| d.supported.clone())
                .unwrap_or_default();
            for other in others {
                if let Some(detail) = other.value.detail::<HardwareWalletDetail>() {
                    supported.extend(detail.supported.iter().cloned());
                }
            }
            if !supported.is_empty() {
                worst.value.replace_detail(HardwareWalletDetail { supported });
            }
            worst
        })
    }
}

// ---------------------------------------------------------------------------
// Security audits
// ---------------------------------------------------------------------------

/// Has the wallet been audited, with all findings addressed?
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityAudits;

impl SecurityAudits {
    /// Attribute id.
    pub const ID: &'static str = "security_audits";
}

impl Attribute for SecurityAudits {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Security audits",
            "Has the wallet been audited by a third party?",
            "Audits catch vulnerabilities before attackers do.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        let Some(audits) = &facts.features.security_audits else {
            return Ok(Evaluation::unrated("Audit history has not been assessed."));
        };
        let Some(latest) = audits.iter().max_by_key(|a| a.date) else {
            return Ok(rated("unaudited", Rating::Fail, "No third-party audits.")
                .with_how_to_improve("Commission and publish a third-party security audit."));
        };

        let unaddressed: usize = audits.iter().map(|a| a.unaddressed_flaws.len()).sum();
        let mut evaluation = if unaddressed > 0 {
            rated(
                "unaddressed_flaws",
                Rating::Partial,
                format!("Audited, with {unaddressed} reported flaw(s) still unaddressed."),
            )
            .with_how_to_improve("Fix or publicly respond to every audit finding.")
        } else {
            rated("audited", Rating::Pass, "Audited, with all findings addressed.")
        };
        evaluation = evaluation.with_details(format!(
            "{} audit(s); most recent by {} on {}.",
            audits.len(),
            latest.auditor,
            latest.date
        ));
        for audit in audits {
            if let Some(url) = &audit.report_url {
                evaluation = evaluation.with_reference(Reference {
                    urls: vec![url.clone()],
                    explanation: Some(format!("{} audit report ({})", audit.auditor, audit.date)),
                });
            }
        }
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{generic, resolved};
    use chrono::NaiveDate;
    use rating_core::features::{
        ChainVerification as Verification, HardwareWalletSupport as Support, LightClient,
        SecurityAudit,
    };
    use rating_core::ResolvedFeatures;

    // ── Chain verification ─────────────────────────────────────────

    #[test]
    fn light_client_passes() {
        let features = ResolvedFeatures {
            chain_verification: Some(Verification {
                light_client: Some(LightClient::Helios),
            }),
            ..Default::default()
        };
        let eval = ChainVerification.evaluate(&generic(Variant::Desktop, features)).unwrap();
        assert_eq!(eval.rating(), Rating::Pass);
        assert_eq!(eval.outcome().as_str(), "light_client_helios");
    }

    #[test]
    fn no_light_client_fails() {
        let features = ResolvedFeatures {
            chain_verification: Some(Verification { light_client: None }),
            ..Default::default()
        };
        let eval = ChainVerification.evaluate(&generic(Variant::Mobile, features)).unwrap();
        assert_eq!(eval.rating(), Rating::Fail);
        assert!(eval.how_to_improve.is_some());
    }

    #[test]
    fn chain_verification_exempt_on_hardware() {
        let facts = resolved(
            WalletProfile::Hardware,
            Variant::Hardware,
            ResolvedFeatures::default(),
        );
        assert_eq!(ChainVerification.evaluate(&facts).unwrap().rating(), Rating::Exempt);
    }

    // ── Hardware wallet support ────────────────────────────────────

    fn support(devices: &[&str], clear_signing: Option<bool>) -> ResolvedFeatures {
        ResolvedFeatures {
            hardware_wallets: Some(Support {
                supported: devices.iter().map(|d| d.to_string()).collect(),
                clear_signing,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn hardware_support_ratings() {
        let cases = [
            (support(&[], None), Rating::Fail),
            (support(&["ledger"], Some(false)), Rating::Partial),
            (support(&["ledger"], Some(true)), Rating::Pass),
            (support(&["ledger"], None), Rating::Unrated),
            (ResolvedFeatures::default(), Rating::Unrated),
        ];
        for (features, expected) in cases {
            let eval = HardwareWalletSupport
                .evaluate(&generic(Variant::Desktop, features))
                .unwrap();
            assert_eq!(eval.rating(), expected, "{}", eval.outcome());
        }
    }

    #[test]
    fn hardware_support_exempt_for_payments() {
        let facts = resolved(WalletProfile::Payments, Variant::Mobile, support(&[], None));
        assert_eq!(HardwareWalletSupport.evaluate(&facts).unwrap().rating(), Rating::Exempt);
    }

    #[test]
    fn hardware_variant_on_software_profile_is_a_violation() {
        let facts = resolved(
            WalletProfile::Generic,
            Variant::Hardware,
            ResolvedFeatures::default(),
        );
        assert!(matches!(
            HardwareWalletSupport.evaluate(&facts),
            Err(RatingError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn aggregate_merges_supported_devices() {
        let desktop = HardwareWalletSupport
            .evaluate(&generic(Variant::Desktop, support(&["ledger", "trezor"], Some(true))))
            .unwrap();
        let mobile = HardwareWalletSupport
            .evaluate(&generic(Variant::Mobile, support(&["keystone"], Some(false))))
            .unwrap();
        let overall = HardwareWalletSupport.aggregate(&[desktop, mobile]).unwrap();
        assert_eq!(overall.rating(), Rating::Partial);
        let detail = overall.value.detail::<HardwareWalletDetail>().unwrap();
        assert_eq!(
            detail.supported.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["keystone", "ledger", "trezor"]
        );
    }

    // ── Security audits ────────────────────────────────────────────

    fn audit(day: u32, flaws: &[&str]) -> SecurityAudit {
        SecurityAudit {
            auditor: format!("auditor{day}"),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            unaddressed_flaws: flaws.iter().map(|f| f.to_string()).collect(),
            report_url: Some(format!("https://audits.example/{day}")),
        }
    }

    #[test]
    fn audits_ratings() {
        let none = ResolvedFeatures {
            security_audits: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            SecurityAudits.evaluate(&generic(Variant::Desktop, none)).unwrap().rating(),
            Rating::Fail
        );

        let flawed = ResolvedFeatures {
            security_audits: Some(vec![audit(3, &[]), audit(9, &["reentrancy"])]),
            ..Default::default()
        };
        let eval = SecurityAudits.evaluate(&generic(Variant::Desktop, flawed)).unwrap();
        assert_eq!(eval.rating(), Rating::Partial);
        assert!(eval.details.unwrap().contains("auditor9 on 2025-01-09"));
        assert_eq!(eval.references.len(), 2);

        let clean = ResolvedFeatures {
            security_audits: Some(vec![audit(1, &[])]),
            ..Default::default()
        };
        assert_eq!(
            SecurityAudits.evaluate(&generic(Variant::Desktop, clean)).unwrap().rating(),
            Rating::Pass
        );
    }
}
