//! # Cross-Variant Aggregation
//!
//! Combines per-variant evaluation trees into the overall tree, and
//! classifies how much each variant's rating differs from the others.
//!
//! ## Worst Rating Wins
//!
//! The default [`Attribute::aggregate`](crate::Attribute::aggregate) policy
//! returns the evaluation with the worst rating under
//! [`Rating::aggregation_rank`]:
//!
//! ```text
//! UNRATED < FAIL < PARTIAL < PASS        (EXEMPT skipped)
//! ```
//!
//! Ties keep the first encounter. If every evaluation is `Exempt`, the first
//! one is returned, so the aggregate is `Exempt`.
//!
//! ## Variant Specificity
//!
//! For each (variant, attribute) pair, this variant's outcome id is compared
//! with every other non-exempt variant's outcome id:
//!
//! | own rating | any equal | any different | classification |
//! |------------|-----------|---------------|----------------|
//! | EXEMPT     |     -     |       -       | ExemptForThisVariant |
//! |            |    no     |      no       | OnlyAssessedForThisVariant |
//! |            |    yes    |      no       | AllSame |
//! |            |    no     |      yes      | UniqueToVariant |
//! |            |    yes    |      yes      | NotUniversal |

use std::collections::BTreeMap;

use rating_core::{RatingError, Variant};
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeRegistry;
use crate::id::AttributeId;
use crate::tree::{EvaluatedAttribute, EvaluatedGroup, EvaluationTree};
use crate::value::Evaluation;

/// Index of the worst-rated evaluation, or `None` for an empty slice.
fn worst_index(evaluations: &[Evaluation]) -> Option<usize> {
    let first = evaluations.first()?;
    let mut worst = 0;
    let mut worst_rating = first.rating();
    for (i, evaluation) in evaluations.iter().enumerate().skip(1) {
        let rating = evaluation.rating();
        if worst_rating.worse_of(rating) != worst_rating {
            worst = i;
            worst_rating = rating;
        }
    }
    Some(worst)
}

/// Default aggregation: return the worst-rated evaluation.
///
/// Fails with [`RatingError::EmptyAggregation`] for an empty slice.
pub fn pick_worst_rating(
    attribute: &AttributeId,
    evaluations: &[Evaluation],
) -> Result<Evaluation, RatingError> {
    let index = worst_index(evaluations).ok_or_else(|| RatingError::EmptyAggregation {
        attribute: attribute.to_string(),
    })?;
    Ok(evaluations[index].clone())
}

/// Pick the worst evaluation, then let `merge` fold detail from the other
/// non-exempt evaluations into it.
///
/// `merge` receives the worst evaluation by value and the remaining
/// non-exempt evaluations in input order. It is not called when every
/// evaluation is `Exempt`.
pub fn merge_worst_with<F>(
    attribute: &AttributeId,
    evaluations: &[Evaluation],
    merge: F,
) -> Result<Evaluation, RatingError>
where
    F: FnOnce(Evaluation, Vec<&Evaluation>) -> Evaluation,
{
    let index = worst_index(evaluations).ok_or_else(|| RatingError::EmptyAggregation {
        attribute: attribute.to_string(),
    })?;
    let worst = evaluations[index].clone();
    if worst.rating().is_exempt() {
        return Ok(worst);
    }
    let others = evaluations
        .iter()
        .enumerate()
        .filter(|&(i, e)| i != index && !e.rating().is_exempt())
        .map(|(_, e)| e)
        .collect();
    Ok(merge(worst, others))
}

/// Build the overall tree from per-variant trees.
///
/// Each attribute's [`aggregate`](crate::Attribute::aggregate) receives the
/// per-variant evaluations in the order of `trees`.
pub fn aggregate_trees(
    registry: &AttributeRegistry,
    trees: &[(Variant, &EvaluationTree)],
) -> Result<EvaluationTree, RatingError> {
    let mut groups = Vec::with_capacity(registry.groups().len());
    for group in registry.groups() {
        let mut attributes = Vec::with_capacity(group.attributes().len());
        for weighted in group.attributes() {
            let evaluations = trees
                .iter()
                .map(|(variant, tree)| tree.require(weighted.id(), variant.as_str()).cloned())
                .collect::<Result<Vec<_>, _>>()?;
            let evaluation = weighted.attribute().aggregate(&evaluations)?;
            attributes.push(EvaluatedAttribute {
                attribute: weighted.id().clone(),
                evaluation,
            });
        }
        groups.push(EvaluatedGroup {
            id: group.id().clone(),
            attributes,
        });
    }
    Ok(EvaluationTree::from_groups(groups))
}

/// How much one variant's rating for an attribute differs from the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantSpecificity {
    /// This variant's own evaluation is `Exempt`.
    ExemptForThisVariant,
    /// No other variant has a non-exempt evaluation.
    OnlyAssessedForThisVariant,
    /// Every other non-exempt variant shares this outcome.
    AllSame,
    /// No other non-exempt variant shares this outcome.
    UniqueToVariant,
    /// Some other non-exempt variants share this outcome, some do not.
    NotUniversal,
}

impl VariantSpecificity {
    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExemptForThisVariant => "EXEMPT_FOR_THIS_VARIANT",
            Self::OnlyAssessedForThisVariant => "ONLY_ASSESSED_FOR_THIS_VARIANT",
            Self::AllSame => "ALL_SAME",
            Self::UniqueToVariant => "UNIQUE_TO_VARIANT",
            Self::NotUniversal => "NOT_UNIVERSAL",
        }
    }
}

impl std::fmt::Display for VariantSpecificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one evaluation against the other variants' evaluations of the
/// same attribute.
pub fn classify<'a>(
    own: &Evaluation,
    others: impl IntoIterator<Item = &'a Evaluation>,
) -> VariantSpecificity {
    if own.rating().is_exempt() {
        return VariantSpecificity::ExemptForThisVariant;
    }
    let mut any_equal = false;
    let mut any_different = false;
    for other in others {
        if other.rating().is_exempt() {
            continue;
        }
        if other.outcome() == own.outcome() {
            any_equal = true;
        } else {
            any_different = true;
        }
    }
    match (any_equal, any_different) {
        (false, false) => VariantSpecificity::OnlyAssessedForThisVariant,
        (true, false) => VariantSpecificity::AllSame,
        (false, true) => VariantSpecificity::UniqueToVariant,
        (true, true) => VariantSpecificity::NotUniversal,
    }
}

/// Per-variant, per-attribute specificity.
pub type SpecificityMap = BTreeMap<Variant, BTreeMap<AttributeId, VariantSpecificity>>;

/// Classify every (variant, attribute) pair across `trees`.
///
/// Every tree must carry the same attributes; a tree lacking one that
/// another has fails with [`RatingError::MissingEvaluation`].
pub fn classify_variant_specificity(
    trees: &[(Variant, &EvaluationTree)],
) -> Result<SpecificityMap, RatingError> {
    let mut result = SpecificityMap::new();
    for (i, (variant, tree)) in trees.iter().enumerate() {
        let mut per_attribute = BTreeMap::new();
        for (_, entry) in tree.attributes() {
            let mut others = Vec::with_capacity(trees.len().saturating_sub(1));
            for (j, (other_variant, other_tree)) in trees.iter().enumerate() {
                if i != j {
                    others.push(other_tree.require(&entry.attribute, other_variant.as_str())?);
                }
            }
            per_attribute.insert(
                entry.attribute.clone(),
                classify(&entry.evaluation, others),
            );
        }
        result.insert(*variant, per_attribute);
    }
    Ok(result)
}
