//! # Evaluation Trees
//!
//! An [`EvaluationTree`] nests evaluations the same way the registry nests
//! attributes: ordered groups, each holding ordered attribute evaluations.
//! One tree is built per resolved variant; cross-variant aggregation
//! produces one more, the "overall" tree.

use rating_core::{Rating, RatingError, ResolvedFacts};
use serde::Serialize;

use crate::attribute::AttributeRegistry;
use crate::id::{AttributeId, GroupId};
use crate::value::Evaluation;

/// One attribute's evaluation inside a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedAttribute {
    /// The attribute evaluated.
    pub attribute: AttributeId,
    /// Its evaluation.
    pub evaluation: Evaluation,
}

/// One group's evaluations, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedGroup {
    /// The group identifier.
    pub id: GroupId,
    /// Attribute evaluations in registry order.
    pub attributes: Vec<EvaluatedAttribute>,
}

impl EvaluatedGroup {
    /// The evaluation of one attribute in this group.
    pub fn get(&self, attribute: &str) -> Option<&Evaluation> {
        self.attributes
            .iter()
            .find(|a| a.attribute.as_str() == attribute)
            .map(|a| &a.evaluation)
    }
}

/// Group → attribute → evaluation, for one variant or for the overall view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EvaluationTree {
    groups: Vec<EvaluatedGroup>,
}

impl EvaluationTree {
    /// Evaluate every registered attribute against one variant's facts.
    ///
    /// Fails fast on the first evaluator error; no partial tree is returned.
    pub fn build(registry: &AttributeRegistry, facts: &ResolvedFacts) -> Result<Self, RatingError> {
        let mut groups = Vec::with_capacity(registry.groups().len());
        for group in registry.groups() {
            let mut attributes = Vec::with_capacity(group.attributes().len());
            for weighted in group.attributes() {
                let evaluation = weighted.attribute().evaluate(facts)?;
                tracing::trace!(
                    wallet = %facts.wallet_id(),
                    variant = %facts.variant,
                    attribute = %weighted.id(),
                    rating = %evaluation.rating(),
                    outcome = %evaluation.outcome(),
                    "attribute evaluated"
                );
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
        tracing::debug!(
            wallet = %facts.wallet_id(),
            variant = %facts.variant,
            "variant evaluation tree built"
        );
        Ok(Self { groups })
    }

    pub(crate) fn from_groups(groups: Vec<EvaluatedGroup>) -> Self {
        Self { groups }
    }

    /// Groups in registry order.
    pub fn groups(&self) -> &[EvaluatedGroup] {
        &self.groups
    }

    /// Look up one group.
    pub fn group(&self, id: &str) -> Option<&EvaluatedGroup> {
        self.groups.iter().find(|g| g.id.as_str() == id)
    }

    /// Look up one attribute's evaluation.
    pub fn get(&self, attribute: &str) -> Option<&Evaluation> {
        self.groups.iter().find_map(|g| g.get(attribute))
    }

    /// Look up one attribute's evaluation, failing with
    /// [`RatingError::MissingEvaluation`] naming `scope` if absent.
    pub fn require(&self, attribute: &str, scope: &str) -> Result<&Evaluation, RatingError> {
        self.get(attribute)
            .ok_or_else(|| RatingError::MissingEvaluation {
                attribute: attribute.to_string(),
                scope: scope.to_string(),
            })
    }

    /// Shorthand for the rating of one attribute.
    pub fn rating(&self, attribute: &str) -> Option<Rating> {
        self.get(attribute).map(Evaluation::rating)
    }

    /// Every evaluated attribute with its group id, in registry order.
    pub fn attributes(&self) -> impl Iterator<Item = (&GroupId, &EvaluatedAttribute)> {
        self.groups
            .iter()
            .flat_map(|g| g.attributes.iter().map(move |a| (&g.id, a)))
    }

    /// Like [`attributes`](Self::attributes), skipping `Exempt` evaluations.
    pub fn non_exempt(&self) -> impl Iterator<Item = (&GroupId, &EvaluatedAttribute)> {
        self.attributes()
            .filter(|(_, a)| !a.evaluation.rating().is_exempt())
    }

    /// Attributes rated `Unrated`, in registry order.
    pub fn unrated(&self) -> impl Iterator<Item = &AttributeId> {
        self.attributes()
            .filter(|(_, a)| a.evaluation.rating() == Rating::Unrated)
            .map(|(_, a)| &a.attribute)
    }
}
