//! # Group Scoring
//!
//! Folds one group of an evaluation tree into a weighted score in `[0, 1]`.
//!
//! - `Exempt` attributes are excluded from numerator and denominator.
//! - `Unrated` attributes are likewise excluded, and flag the score with
//!   `has_unrated_component`.
//! - `Pass` = 1.0, `Partial` = 0.5, `Fail` = 0.0, unless the value carries a
//!   score override.
//!
//! A group with no non-exempt attribute has no score at all. A group whose
//! non-exempt attributes are all unrated still yields a [`GroupScore`], with
//! no numeric value and the unrated flag set, so the two cases stay apart.

use serde::Serialize;

use crate::attribute::AttributeGroup;
use crate::tree::EvaluatedGroup;

/// A group's weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupScore {
    /// Weighted score in `[0, 1]`; `None` when every non-exempt attribute
    /// is unrated.
    pub score: Option<f64>,
    /// Whether any attribute in the group was `Unrated`.
    pub has_unrated_component: bool,
}

impl AttributeGroup {
    /// Score one evaluated group against this group's weights.
    ///
    /// Returns `None` only when every attribute is exempt. Evaluations for
    /// attributes this group does not declare are ignored.
    pub fn score(&self, evaluated: &EvaluatedGroup) -> Option<GroupScore> {
        let mut weighted_sum = 0.0;
        let mut weight_denom = 0.0;
        let mut has_unrated_component = false;
        let mut any_applicable = false;

        for weighted in self.attributes() {
            let Some(evaluation) = evaluated.get(weighted.id()) else {
                tracing::warn!(
                    group = %self.id(),
                    attribute = %weighted.id(),
                    "attribute missing from evaluated group; excluded from score"
                );
                continue;
            };
            if evaluation.rating().is_exempt() {
                continue;
            }
            any_applicable = true;
            match evaluation.value.numeric_score() {
                Some(score) => {
                    weighted_sum += weighted.weight() * score;
                    weight_denom += weighted.weight();
                }
                None => has_unrated_component = true,
            }
        }

        if !any_applicable {
            return None;
        }
        Some(GroupScore {
            score: (weight_denom > 0.0).then(|| weighted_sum / weight_denom),
            has_unrated_component,
        })
    }
}
