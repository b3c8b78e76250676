#![deny(missing_docs)]

//! # rating-engine: Evaluation, Aggregation, and Ladders
//!
//! Turns a [`WalletFacts`](rating_core::WalletFacts) document into an
//! immutable [`RatedWallet`]:
//!
//! 1. **Attribute contract** ([`Attribute`]): one rating criterion mapping a
//!    variant's resolved facts to an [`Evaluation`].
//! 2. **Tree builder** ([`EvaluationTree::build`]): every registered
//!    attribute evaluated for one variant, grouped as in the
//!    [`AttributeRegistry`].
//! 3. **Cross-variant aggregation** ([`aggregate_trees`],
//!    [`classify_variant_specificity`]): the overall tree plus a
//!    per-(variant, attribute) [`VariantSpecificity`].
//! 4. **Group scoring** ([`AttributeGroup::score`]).
//! 5. **Stage ladders** ([`Ladder`]): the highest contiguous cleared stage.
//!
//! The pipeline is synchronous and pure. Rating several wallets is
//! independent per wallet; callers may parallelize freely.

pub mod aggregate;
pub mod attribute;
pub mod id;
pub mod ladder;
pub mod score;
pub mod tree;
pub mod value;
pub mod wallet;

pub use aggregate::{
    aggregate_trees, classify, classify_variant_specificity, merge_worst_with, pick_worst_rating,
    SpecificityMap, VariantSpecificity,
};
pub use attribute::{
    Attribute, AttributeGroup, AttributeMetadata, AttributeRegistry, WeightedAttribute,
};
pub use id::{AttributeId, GroupId, LadderId, OutcomeId};
pub use ladder::{
    merge_criterion_ratings, AttributeCriterion, CriteriaGroup, CriteriaGroupReport,
    CriterionRating, CriterionReport, Ladder, LadderApplicability, LadderEvaluation, LadderReport,
    LadderSubject, Stage, StageCriterion, StageReport,
};
pub use score::GroupScore;
pub use tree::{EvaluatedAttribute, EvaluatedGroup, EvaluationTree};
pub use value::{Evaluation, Reference, Value, ValueDetail};
pub use wallet::{RatedWallet, ResolvedVariant, ScoredGroup};
