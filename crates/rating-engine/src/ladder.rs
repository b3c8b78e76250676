//! # Stage Ladders
//!
//! A [`Ladder`] is an ordered sequence of cumulative qualification bars
//! ([`Stage`]s). Each stage holds one or more [`CriteriaGroup`]s, each
//! holding one or more [`StageCriterion`]s rated Pass / Fail / Unrated.
//!
//! ## Stage Walk
//!
//! Stages are evaluated in declared order and the walk stops at the first
//! stage that does not pass:
//!
//! ```text
//! stage k has any UNRATED criterion → Unrated { stage: k }
//! stage k has any FAIL criterion    → Stage { k - 1 }  (or QualifiedForNoStages if k = 0)
//! every stage passes                → Stage { last }
//! ```
//!
//! Later stages are never consulted once one fails, so the reported stage
//! is always the highest contiguous cleared stage from the first.
//!
//! ## Criteria From Attributes
//!
//! [`AttributeCriterion`] derives a criterion from an attribute's per-variant
//! ratings: Pass and Unrated pass through, Partial becomes Fail unless
//! explicitly allowed, Exempt variants are skipped. The per-variant results
//! merge with [`merge_criterion_ratings`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rating_core::{Rating, RatingError, Variant, WalletMetadata, WalletProfile};
use serde::{Deserialize, Serialize};

use crate::id::{AttributeId, LadderId};
use crate::wallet::ResolvedVariant;

/// Outcome of one ladder criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionRating {
    /// The criterion is met.
    Pass,
    /// The criterion is not met.
    Fail,
    /// Not enough data to decide.
    Unrated,
}

impl CriterionRating {
    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Unrated => "UNRATED",
        }
    }
}

impl fmt::Display for CriterionRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge several criterion results: any `Unrated` wins, then any `Fail`,
/// else `Pass`. Returns `None` for an empty input.
pub fn merge_criterion_ratings(
    ratings: impl IntoIterator<Item = CriterionRating>,
) -> Option<CriterionRating> {
    let mut merged = None;
    for rating in ratings {
        merged = Some(match (merged, rating) {
            (_, CriterionRating::Unrated) | (Some(CriterionRating::Unrated), _) => {
                CriterionRating::Unrated
            }
            (_, CriterionRating::Fail) | (Some(CriterionRating::Fail), _) => CriterionRating::Fail,
            _ => CriterionRating::Pass,
        });
    }
    merged
}

/// The rated wallet as seen by ladder criteria.
#[derive(Debug, Clone, Copy)]
pub struct LadderSubject<'a> {
    /// Wallet metadata.
    pub metadata: &'a WalletMetadata,
    /// Declared profile.
    pub profile: WalletProfile,
    /// Per-variant facts and evaluation trees, in variant order.
    pub variants: &'a BTreeMap<Variant, ResolvedVariant>,
}

/// One criterion of a ladder stage.
pub trait StageCriterion: Send + Sync + fmt::Debug {
    /// Identifier, unique within its ladder.
    fn id(&self) -> &str;

    /// Human-readable description of the bar.
    fn description(&self) -> &str;

    /// Rate the subject against this criterion.
    ///
    /// `ladder` names the ladder being walked, for error reporting.
    fn evaluate(
        &self,
        ladder: &LadderId,
        subject: &LadderSubject<'_>,
    ) -> Result<CriterionRating, RatingError>;
}

/// A criterion derived from an attribute's per-variant ratings.
#[derive(Debug, Clone)]
pub struct AttributeCriterion {
    id: String,
    description: String,
    attribute: AttributeId,
    required: Rating,
}

impl AttributeCriterion {
    /// Require the attribute to rate `Pass` on every applicable variant.
    pub fn new(attribute: impl Into<AttributeId>, description: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            id: attribute.to_string(),
            description: description.into(),
            attribute,
            required: Rating::Pass,
        }
    }

    /// Also accept `Partial`.
    pub fn allowing_partial(mut self) -> Self {
        self.required = Rating::Partial;
        self
    }

    /// Override the criterion id (defaults to the attribute id).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// The attribute this criterion derives from.
    pub fn attribute(&self) -> &AttributeId {
        &self.attribute
    }

    /// Map one attribute rating; `None` for `Exempt`.
    fn map_rating(&self, rating: Rating) -> Option<CriterionRating> {
        match rating {
            Rating::Exempt => None,
            Rating::Unrated => Some(CriterionRating::Unrated),
            rated if rated.severity() >= self.required.severity() => Some(CriterionRating::Pass),
            _ => Some(CriterionRating::Fail),
        }
    }
}

impl StageCriterion for AttributeCriterion {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn evaluate(
        &self,
        ladder: &LadderId,
        subject: &LadderSubject<'_>,
    ) -> Result<CriterionRating, RatingError> {
        if subject.variants.is_empty() {
            return Err(RatingError::EmptyCriteriaGroup {
                ladder: ladder.to_string(),
                criterion: self.id.clone(),
            });
        }
        let mut ratings = Vec::with_capacity(subject.variants.len());
        for (variant, resolved) in subject.variants {
            let rating = resolved
                .tree
                .require(&self.attribute, variant.as_str())?
                .rating();
            if let Some(mapped) = self.map_rating(rating) {
                ratings.push(mapped);
            }
        }
        merge_criterion_ratings(ratings).ok_or_else(|| RatingError::ExemptCriterion {
            criterion: self.id.clone(),
            attribute: self.attribute.to_string(),
        })
    }
}

/// A named set of criteria inside a stage.
#[derive(Debug)]
pub struct CriteriaGroup {
    id: String,
    display_name: String,
    criteria: Vec<Box<dyn StageCriterion>>,
}

impl CriteriaGroup {
    /// Create an empty group. Add criteria with [`with`](Self::with).
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            criteria: Vec::new(),
        }
    }

    /// Append a criterion.
    pub fn with(mut self, criterion: impl StageCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }

    /// Group identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Criteria in declaration order.
    pub fn criteria(&self) -> &[Box<dyn StageCriterion>] {
        &self.criteria
    }
}

/// One qualification bar.
#[derive(Debug)]
pub struct Stage {
    id: String,
    display_name: String,
    groups: Vec<CriteriaGroup>,
}

impl Stage {
    /// Create an empty stage. Add groups with [`with`](Self::with).
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            groups: Vec::new(),
        }
    }

    /// Append a criteria group.
    pub fn with(mut self, group: CriteriaGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Stage identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Criteria groups in declaration order.
    pub fn groups(&self) -> &[CriteriaGroup] {
        &self.groups
    }
}

/// Which wallets a ladder applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderApplicability {
    /// Every wallet.
    AllWallets,
    /// Wallets with one of these profiles.
    Profiles(BTreeSet<WalletProfile>),
}

impl LadderApplicability {
    /// Shorthand for a single-profile ladder.
    pub fn only(profile: WalletProfile) -> Self {
        Self::Profiles(BTreeSet::from([profile]))
    }

    /// Whether a wallet with `profile` is rated on this ladder.
    pub fn applies_to(&self, profile: WalletProfile) -> bool {
        match self {
            Self::AllWallets => true,
            Self::Profiles(profiles) => profiles.contains(&profile),
        }
    }
}

/// Result of walking a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum LadderEvaluation {
    /// The ladder does not apply to this wallet.
    NotApplicable,
    /// The named stage had an unrated criterion.
    Unrated {
        /// The stage that could not be decided.
        stage: String,
    },
    /// The first stage was not cleared.
    QualifiedForNoStages,
    /// The highest contiguous cleared stage.
    Stage {
        /// Zero-based stage index.
        index: usize,
        /// Stage identifier.
        id: String,
    },
}

impl fmt::Display for LadderEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => f.write_str("not applicable"),
            Self::Unrated { stage } => write!(f, "unrated (at {stage})"),
            Self::QualifiedForNoStages => f.write_str("qualified for no stages"),
            Self::Stage { index, id } => write!(f, "stage {index} ({id})"),
        }
    }
}

/// One criterion's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionReport {
    /// Criterion identifier.
    pub id: String,
    /// Criterion description.
    pub description: String,
    /// Result.
    pub rating: CriterionRating,
}

/// One criteria group's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaGroupReport {
    /// Group identifier.
    pub id: String,
    /// Merged result of the group's criteria.
    pub rating: CriterionRating,
    /// Per-criterion results.
    pub criteria: Vec<CriterionReport>,
}

/// One evaluated stage's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Stage identifier.
    pub id: String,
    /// Merged result of the stage's groups.
    pub rating: CriterionRating,
    /// Per-group results.
    pub groups: Vec<CriteriaGroupReport>,
}

/// A ladder result with the per-stage breakdown up to where the walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderReport {
    /// The ladder walked.
    pub ladder: LadderId,
    /// The result.
    pub result: LadderEvaluation,
    /// Evaluated stages, in order. Stages after the stopping point are absent.
    pub stages: Vec<StageReport>,
}

/// An ordered sequence of qualification stages.
#[derive(Debug)]
pub struct Ladder {
    id: LadderId,
    display_name: String,
    applicability: LadderApplicability,
    stages: Vec<Stage>,
}

impl Ladder {
    /// Build a ladder, validating that it has at least one stage, every
    /// stage has at least one group, every group at least one criterion,
    /// and stage ids and criterion ids are unique within the ladder.
    pub fn new(
        id: impl Into<LadderId>,
        display_name: impl Into<String>,
        applicability: LadderApplicability,
        stages: Vec<Stage>,
    ) -> Result<Self, RatingError> {
        let id = id.into();
        let invalid = |reason: String| RatingError::InvalidLadder {
            ladder: id.to_string(),
            reason,
        };

        if stages.is_empty() {
            return Err(invalid("ladder has no stages".into()));
        }
        let mut stage_ids = BTreeSet::new();
        let mut criterion_ids = BTreeSet::new();
        for stage in &stages {
            if !stage_ids.insert(stage.id.as_str()) {
                return Err(invalid(format!("duplicate stage id {}", stage.id)));
            }
            if stage.groups.is_empty() {
                return Err(invalid(format!("stage {} has no criteria groups", stage.id)));
            }
            for group in &stage.groups {
                if group.criteria.is_empty() {
                    return Err(invalid(format!(
                        "criteria group {} in stage {} has no criteria",
                        group.id, stage.id
                    )));
                }
                for criterion in &group.criteria {
                    if !criterion_ids.insert(criterion.id()) {
                        return Err(invalid(format!("duplicate criterion id {}", criterion.id())));
                    }
                }
            }
        }

        Ok(Self {
            id,
            display_name: display_name.into(),
            applicability,
            stages,
        })
    }

    /// Ladder identifier.
    pub fn id(&self) -> &LadderId {
        &self.id
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Which wallets the ladder applies to.
    pub fn applicability(&self) -> &LadderApplicability {
        &self.applicability
    }

    /// Stages in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Walk the ladder for one wallet.
    pub fn evaluate(&self, subject: &LadderSubject<'_>) -> Result<LadderReport, RatingError> {
        if !self.applicability.applies_to(subject.profile) {
            return Ok(LadderReport {
                ladder: self.id.clone(),
                result: LadderEvaluation::NotApplicable,
                stages: Vec::new(),
            });
        }

        let mut reports = Vec::with_capacity(self.stages.len());
        let mut result = None;
        for (index, stage) in self.stages.iter().enumerate() {
            let report = self.evaluate_stage(stage, subject)?;
            let rating = report.rating;
            reports.push(report);
            match rating {
                CriterionRating::Pass => continue,
                CriterionRating::Unrated => {
                    result = Some(LadderEvaluation::Unrated {
                        stage: stage.id.clone(),
                    });
                }
                CriterionRating::Fail => {
                    result = Some(match index.checked_sub(1) {
                        Some(previous) => LadderEvaluation::Stage {
                            index: previous,
                            id: self.stages[previous].id.clone(),
                        },
                        None => LadderEvaluation::QualifiedForNoStages,
                    });
                }
            }
            break;
        }

        let result = match result {
            Some(result) => result,
            None => {
                let last = self.stages.len() - 1;
                LadderEvaluation::Stage {
                    index: last,
                    id: self.stages[last].id.clone(),
                }
            }
        };

        tracing::debug!(
            wallet = %subject.metadata.id,
            ladder = %self.id,
            result = %result,
            "ladder evaluated"
        );
        Ok(LadderReport {
            ladder: self.id.clone(),
            result,
            stages: reports,
        })
    }

    fn evaluate_stage(
        &self,
        stage: &Stage,
        subject: &LadderSubject<'_>,
    ) -> Result<StageReport, RatingError> {
        let mut groups = Vec::with_capacity(stage.groups.len());
        for group in &stage.groups {
            let mut criteria = Vec::with_capacity(group.criteria.len());
            for criterion in &group.criteria {
                let rating = criterion.evaluate(&self.id, subject)?;
                criteria.push(CriterionReport {
                    id: criterion.id().to_string(),
                    description: criterion.description().to_string(),
                    rating,
                });
            }
            let rating = merge_criterion_ratings(criteria.iter().map(|c| c.rating)).ok_or_else(
                || RatingError::EmptyCriteriaGroup {
                    ladder: self.id.to_string(),
                    criterion: group.id.clone(),
                },
            )?;
            groups.push(CriteriaGroupReport {
                id: group.id.clone(),
                rating,
                criteria,
            });
        }
        let rating = merge_criterion_ratings(groups.iter().map(|g| g.rating)).ok_or_else(|| {
            RatingError::EmptyCriteriaGroup {
                ladder: self.id.to_string(),
                criterion: stage.id.clone(),
            }
        })?;
        Ok(StageReport {
            id: stage.id.clone(),
            rating,
            groups,
        })
    }
}
