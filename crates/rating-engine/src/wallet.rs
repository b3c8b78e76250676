//! # Rated Wallet
//!
//! [`RatedWallet::rate`] is the single entry point of the engine. It runs
//! the whole pipeline for one wallet and freezes the result:
//!
//! ```text
//! validate facts → resolve each variant → per-variant trees
//!   → overall tree → specificity → group scores → ladders
//! ```
//!
//! Any invariant violation aborts the build; no partial result is returned.
//! The built value is never mutated. A changed fact requires a rebuild, and
//! [`RatedWallet::facts_digest`] identifies which facts a result came from.

use std::collections::{BTreeMap, BTreeSet};

use rating_core::{
    ContentDigest, RatingError, ResolvedFacts, Variant, WalletFacts, WalletMetadata, WalletProfile,
};
use serde::Serialize;

use crate::aggregate::{
    aggregate_trees, classify_variant_specificity, SpecificityMap, VariantSpecificity,
};
use crate::attribute::AttributeRegistry;
use crate::id::{AttributeId, GroupId, LadderId};
use crate::ladder::{Ladder, LadderEvaluation, LadderReport, LadderSubject};
use crate::score::GroupScore;
use crate::tree::EvaluationTree;
use crate::value::Evaluation;

/// One variant's resolved facts and evaluation tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedVariant {
    /// Facts resolved for this variant.
    pub facts: ResolvedFacts,
    /// Evaluations of every registered attribute for this variant.
    pub tree: EvaluationTree,
}

/// A group's overall score. `score` is `None` when no attribute in the
/// group contributed weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGroup {
    /// Group identifier.
    pub group: GroupId,
    /// Human-readable group name.
    pub display_name: String,
    /// The score.
    pub score: Option<GroupScore>,
}

/// The immutable result of rating one wallet.
#[derive(Debug, Clone, Serialize)]
pub struct RatedWallet {
    metadata: WalletMetadata,
    profile: WalletProfile,
    facts_digest: ContentDigest,
    variants: BTreeMap<Variant, ResolvedVariant>,
    overall: EvaluationTree,
    specificity: SpecificityMap,
    group_scores: Vec<ScoredGroup>,
    ladders: BTreeMap<LadderId, LadderReport>,
}

impl RatedWallet {
    /// Rate one wallet.
    ///
    /// Fails on an invalid fact document, an evaluator invariant violation,
    /// a criterion yielding `Exempt` on an applicable wallet, or duplicate
    /// ladder ids.
    pub fn rate(
        facts: &WalletFacts,
        registry: &AttributeRegistry,
        ladders: &[Ladder],
    ) -> Result<Self, RatingError> {
        facts.validate()?;
        let facts_digest = ContentDigest::of(facts)?;
        let wallet = &facts.metadata.id;

        let mut variants = BTreeMap::new();
        for &variant in &facts.variants {
            let resolved = facts.resolve(variant)?;
            let tree = EvaluationTree::build(registry, &resolved)?;
            variants.insert(
                variant,
                ResolvedVariant {
                    facts: resolved,
                    tree,
                },
            );
        }

        let trees: Vec<(Variant, &EvaluationTree)> =
            variants.iter().map(|(v, r)| (*v, &r.tree)).collect();
        let overall = aggregate_trees(registry, &trees)?;
        let specificity = classify_variant_specificity(&trees)?;

        let group_scores = registry
            .groups()
            .iter()
            .map(|group| ScoredGroup {
                group: group.id().clone(),
                display_name: group.display_name().to_string(),
                score: overall.group(group.id()).and_then(|e| group.score(e)),
            })
            .collect();

        let subject = LadderSubject {
            metadata: &facts.metadata,
            profile: facts.profile,
            variants: &variants,
        };
        let mut ladder_reports = BTreeMap::new();
        let mut seen = BTreeSet::new();
        for ladder in ladders {
            if !seen.insert(ladder.id()) {
                return Err(RatingError::InvalidLadder {
                    ladder: ladder.id().to_string(),
                    reason: "duplicate ladder id".into(),
                });
            }
            let report = ladder.evaluate(&subject)?;
            ladder_reports.insert(ladder.id().clone(), report);
        }

        tracing::debug!(
            wallet = %wallet,
            variants = variants.len(),
            ladders = ladder_reports.len(),
            digest = %facts_digest,
            "wallet rated"
        );

        Ok(Self {
            metadata: facts.metadata.clone(),
            profile: facts.profile,
            facts_digest,
            variants,
            overall,
            specificity,
            group_scores,
            ladders: ladder_reports,
        })
    }

    /// Wallet metadata.
    pub fn metadata(&self) -> &WalletMetadata {
        &self.metadata
    }

    /// Declared profile.
    pub fn profile(&self) -> WalletProfile {
        self.profile
    }

    /// Implemented variants, in canonical order.
    pub fn variants(&self) -> impl Iterator<Item = Variant> + '_ {
        self.variants.keys().copied()
    }

    /// One variant's resolved facts and tree.
    pub fn resolved(&self, variant: Variant) -> Result<&ResolvedVariant, RatingError> {
        self.variants
            .get(&variant)
            .ok_or_else(|| self.unsupported(variant))
    }

    /// The aggregated overall tree.
    pub fn overall(&self) -> &EvaluationTree {
        &self.overall
    }

    /// An attribute's evaluation for one variant, or the overall evaluation
    /// when `variant` is `None`.
    pub fn evaluation(
        &self,
        attribute: &str,
        variant: Option<Variant>,
    ) -> Result<&Evaluation, RatingError> {
        match variant {
            None => self.overall.require(attribute, "overall"),
            Some(variant) => self
                .resolved(variant)?
                .tree
                .require(attribute, variant.as_str()),
        }
    }

    /// How much `variant`'s rating of `attribute` differs from the others.
    pub fn specificity(
        &self,
        variant: Variant,
        attribute: &str,
    ) -> Result<VariantSpecificity, RatingError> {
        let per_attribute = self
            .specificity
            .get(&variant)
            .ok_or_else(|| self.unsupported(variant))?;
        per_attribute
            .get(attribute)
            .copied()
            .ok_or_else(|| RatingError::MissingEvaluation {
                attribute: attribute.to_string(),
                scope: variant.to_string(),
            })
    }

    /// The result of one ladder, if it was evaluated.
    pub fn ladder(&self, id: &str) -> Option<&LadderEvaluation> {
        self.ladders.get(id).map(|r| &r.result)
    }

    /// The full report of one ladder, if it was evaluated.
    pub fn ladder_report(&self, id: &str) -> Option<&LadderReport> {
        self.ladders.get(id)
    }

    /// Every ladder report, by ladder id.
    pub fn ladder_reports(&self) -> impl Iterator<Item = &LadderReport> {
        self.ladders.values()
    }

    /// A group's overall score. `None` if the group is unknown or no
    /// attribute in it contributed weight.
    pub fn group_score(&self, group: &str) -> Option<GroupScore> {
        self.group_scores
            .iter()
            .find(|g| g.group.as_str() == group)
            .and_then(|g| g.score)
    }

    /// Every group's overall score, in registry order.
    pub fn group_scores(&self) -> &[ScoredGroup] {
        &self.group_scores
    }

    /// Attributes whose overall rating is `Unrated`.
    pub fn unrated_attributes(&self) -> Vec<&AttributeId> {
        self.overall.unrated().collect()
    }

    /// Digest of the fact document this result was built from.
    pub fn facts_digest(&self) -> ContentDigest {
        self.facts_digest
    }

    fn unsupported(&self, variant: Variant) -> RatingError {
        RatingError::UnsupportedVariant {
            wallet: self.metadata.id.to_string(),
            variant,
        }
    }
}
