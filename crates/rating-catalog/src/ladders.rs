//! # Reference Ladders
//!
//! - `software_stages` applies to generic and payments wallets.
//! - `hardware_stages` applies to hardware wallets only.
//!
//! Stages are authored so that each one only adds bars to the previous one.

use rating_core::features::SourceVisibility as Visibility;
use rating_core::{RatingError, WalletProfile};
use rating_engine::{
    AttributeCriterion, CriteriaGroup, CriterionRating, Ladder, LadderApplicability, LadderId,
    LadderSubject, Stage, StageCriterion,
};

use crate::privacy::AddressCorrelation;
use crate::security::{ChainVerification, SecurityAudits};
use crate::sovereignty::{SelfHostedNode, TransactionInclusion};
use crate::transparency::{OpenSource, SourceVisibility};

/// Id of the software wallet ladder.
pub const SOFTWARE_STAGES: &str = "software_stages";

/// Id of the hardware wallet ladder.
pub const HARDWARE_STAGES: &str = "hardware_stages";

/// Has the wallet disclosed where its source code lives?
///
/// A direct criterion: passes if the wallet metadata names a repository or
/// any variant's facts name a public one; fails if every variant is known
/// to be private; otherwise unrated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisclosedRepositoryCriterion;

impl StageCriterion for DisclosedRepositoryCriterion {
    fn id(&self) -> &str {
        "disclosed_repository"
    }

    fn description(&self) -> &str {
        "The wallet discloses its source repository"
    }

    fn evaluate(
        &self,
        _ladder: &LadderId,
        subject: &LadderSubject<'_>,
    ) -> Result<CriterionRating, RatingError> {
        if subject
            .metadata
            .repository_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
        {
            return Ok(CriterionRating::Pass);
        }
        let mut any_unknown = false;
        for resolved in subject.variants.values() {
            match &resolved.facts.features.source_visibility {
                Some(Visibility::Public { .. }) => return Ok(CriterionRating::Pass),
                Some(Visibility::Private) => {}
                None => any_unknown = true,
            }
        }
        Ok(if any_unknown {
            CriterionRating::Unrated
        } else {
            CriterionRating::Fail
        })
    }
}

/// Staged bars for software wallets.
pub fn software_stages() -> Result<Ladder, RatingError> {
    Ladder::new(
        SOFTWARE_STAGES,
        "Software wallet stages",
        LadderApplicability::Profiles([WalletProfile::Generic, WalletProfile::Payments].into()),
        vec![
            Stage::new("stage_0", "Stage 0: verifiable").with(
                CriteriaGroup::new("source", "Source code").with(AttributeCriterion::new(
                    SourceVisibility::ID,
                    "The source code is publicly visible",
                )),
            ),
            Stage::new("stage_1", "Stage 1: accountable")
                .with(
                    CriteriaGroup::new("security", "Security").with(AttributeCriterion::new(
                        SecurityAudits::ID,
                        "Audited with all findings addressed",
                    )),
                )
                .with(
                    CriteriaGroup::new("transparency", "Transparency")
                        .with(AttributeCriterion::new(
                            OpenSource::ID,
                            "Released under a FOSS license",
                        ))
                        .with(DisclosedRepositoryCriterion),
                )
                .with(
                    CriteriaGroup::new("privacy", "Privacy").with(
                        AttributeCriterion::new(
                            AddressCorrelation::ID,
                            "No third party can correlate IP and wallet address",
                        )
                        .allowing_partial()
                        .with_id("limited_address_correlation"),
                    ),
                ),
            Stage::new("stage_2", "Stage 2: sovereign").with(
                CriteriaGroup::new("sovereignty", "Self-sovereignty")
                    .with(AttributeCriterion::new(
                        SelfHostedNode::ID,
                        "Works with a self-hosted node",
                    ))
                    .with(AttributeCriterion::new(
                        TransactionInclusion::ID,
                        "Transactions can be self-broadcast",
                    ))
                    .with(AttributeCriterion::new(
                        ChainVerification::ID,
                        "Chain state is verified locally",
                    )),
            ),
        ],
    )
}

/// Staged bars for hardware wallets.
pub fn hardware_stages() -> Result<Ladder, RatingError> {
    Ladder::new(
        HARDWARE_STAGES,
        "Hardware wallet stages",
        LadderApplicability::only(WalletProfile::Hardware),
        vec![
            Stage::new("stage_0", "Stage 0: audited").with(
                CriteriaGroup::new("security", "Security").with(
                    AttributeCriterion::new(SecurityAudits::ID, "Audited by a third party")
                        .allowing_partial(),
                ),
            ),
            Stage::new("stage_1", "Stage 1: open").with(
                CriteriaGroup::new("transparency", "Transparency")
                    .with(AttributeCriterion::new(
                        SourceVisibility::ID,
                        "Firmware source is publicly visible",
                    ))
                    .with(AttributeCriterion::new(OpenSource::ID, "Firmware is FOSS")),
            ),
        ],
    )
}

/// Both reference ladders.
pub fn default_ladders() -> Result<Vec<Ladder>, RatingError> {
    Ok(vec![software_stages()?, hardware_stages()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_core::{ResolvedFacts, ResolvedFeatures, Variant, WalletId, WalletMetadata};
    use rating_engine::{EvaluationTree, ResolvedVariant};
    use std::collections::BTreeMap;

    #[test]
    fn default_ladders_are_valid() {
        let ladders = default_ladders().unwrap();
        assert_eq!(ladders.len(), 2);
        assert_eq!(ladders[0].stages().len(), 3);
        assert!(!ladders[0].applicability().applies_to(WalletProfile::Hardware));
        assert!(ladders[1].applicability().applies_to(WalletProfile::Hardware));
    }

    fn disclosed(
        repository_url: Option<&str>,
        visibility: &[Option<Visibility>],
    ) -> CriterionRating {
        let metadata = WalletMetadata {
            id: WalletId::new("w").unwrap(),
            display_name: "W".into(),
            url: None,
            repository_url: repository_url.map(str::to_string),
        };
        let registry = crate::default_registry().unwrap();
        let variants: BTreeMap<Variant, ResolvedVariant> = visibility
            .iter()
            .zip([Variant::Browser, Variant::Desktop, Variant::Mobile])
            .map(|(v, variant)| {
                let facts = ResolvedFacts {
                    metadata: metadata.clone(),
                    profile: WalletProfile::Generic,
                    variant,
                    features: ResolvedFeatures {
                        source_visibility: v.clone(),
                        ..Default::default()
                    },
                };
                let tree = EvaluationTree::build(&registry, &facts).unwrap();
                (variant, ResolvedVariant { facts, tree })
            })
            .collect();
        let subject = LadderSubject {
            metadata: &metadata,
            profile: WalletProfile::Generic,
            variants: &variants,
        };
        DisclosedRepositoryCriterion
            .evaluate(&LadderId::from(SOFTWARE_STAGES), &subject)
            .unwrap()
    }

    #[test]
    fn repository_in_metadata_passes() {
        assert_eq!(
            disclosed(Some("https://github.com/example/w"), &[None]),
            CriterionRating::Pass
        );
    }

    #[test]
    fn public_variant_passes() {
        let public = Visibility::Public {
            repository: "https://github.com/example/w".into(),
        };
        assert_eq!(
            disclosed(None, &[Some(Visibility::Private), Some(public)]),
            CriterionRating::Pass
        );
    }

    #[test]
    fn all_private_fails_and_unknown_is_unrated() {
        assert_eq!(
            disclosed(None, &[Some(Visibility::Private), Some(Visibility::Private)]),
            CriterionRating::Fail
        );
        assert_eq!(
            disclosed(Some("  "), &[Some(Visibility::Private), None]),
            CriterionRating::Unrated
        );
    }
}
