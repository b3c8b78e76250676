//! # Error Hierarchy
//!
//! Structured error types for the rating engine, built with `thiserror`.
//!
//! Errors are reserved for programming-invariant violations: a malformed
//! fact document, a malformed attribute registry or ladder, a query against
//! a variant the wallet does not implement, or an evaluator that contradicts
//! the wallet's declared profile. Missing data is never an error; it is
//! represented as [`Rating::Unrated`](crate::Rating::Unrated).
//!
//! Every variant carries the identifiers needed to locate the faulty data
//! without re-running the build under a debugger.

use thiserror::Error;

use crate::facts::WalletProfile;
use crate::variant::Variant;

/// Top-level error type for the rating engine.
#[derive(Error, Debug)]
pub enum RatingError {
    /// A variant was requested that the wallet does not implement.
    #[error("wallet {wallet} does not implement the {variant} variant")]
    UnsupportedVariant {
        /// The wallet identifier.
        wallet: String,
        /// The requested variant.
        variant: Variant,
    },

    /// The fact document violates the input contract.
    #[error("invalid fact document: {0}")]
    InvalidFacts(#[from] FactsError),

    /// The attribute registry is malformed.
    #[error("invalid attribute registry: {0}")]
    Registry(#[from] RegistryError),

    /// A ladder definition is malformed.
    #[error("invalid ladder {ladder}: {reason}")]
    InvalidLadder {
        /// The ladder identifier.
        ladder: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An evaluator met a data shape that contradicts the wallet's declared
    /// profile or variant.
    #[error("invariant violated by attribute {attribute} on {variant}: {reason}")]
    InvariantViolation {
        /// The attribute whose evaluator detected the contradiction.
        attribute: String,
        /// The variant being evaluated.
        variant: Variant,
        /// Description of the contradiction.
        reason: String,
    },

    /// An attribute was asked to aggregate zero evaluations.
    #[error("attribute {attribute} was asked to aggregate an empty evaluation set")]
    EmptyAggregation {
        /// The attribute identifier.
        attribute: String,
    },

    /// An evaluation tree has no entry for a registered attribute.
    #[error("no evaluation for attribute {attribute} in the {scope} tree")]
    MissingEvaluation {
        /// The attribute identifier.
        attribute: String,
        /// Which tree was searched ("overall" or a variant name).
        scope: String,
    },

    /// A criteria group produced no per-variant results to merge.
    #[error("criterion {criterion} in ladder {ladder} produced an empty result set")]
    EmptyCriteriaGroup {
        /// The ladder identifier.
        ladder: String,
        /// The criterion identifier.
        criterion: String,
    },

    /// A ladder criterion yielded EXEMPT for a wallet the ladder applies to.
    #[error("criterion {criterion} is exempt on every variant (attribute {attribute})")]
    ExemptCriterion {
        /// The criterion identifier.
        criterion: String,
        /// The attribute the criterion derives from.
        attribute: String,
    },

    /// JSON serialization failure while computing a content digest.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Violations of the fact-document input contract.
///
/// Each implemented variant must have, for every per-variant feature, either
/// a concrete value or an explicit unknown marker. Nothing is defaulted.
#[derive(Error, Debug)]
pub enum FactsError {
    /// The wallet identifier is empty.
    #[error("wallet id must be non-empty")]
    EmptyWalletId,

    /// The document implements no variants.
    #[error("wallet {wallet} declares no variants")]
    NoVariants {
        /// The wallet identifier.
        wallet: String,
    },

    /// A per-variant feature map omits an implemented variant.
    #[error("feature {feature} has no entry for variant {variant} (use null for unknown)")]
    MissingVariantEntry {
        /// Dotted feature path, e.g. `security.chain_verification`.
        feature: &'static str,
        /// The implemented variant that is missing.
        variant: Variant,
    },

    /// A per-variant feature map names a variant the wallet does not implement.
    #[error("feature {feature} has an entry for unimplemented variant {variant}")]
    UnsupportedVariantEntry {
        /// Dotted feature path.
        feature: &'static str,
        /// The unimplemented variant.
        variant: Variant,
    },

    /// The declared profile and the implemented variants contradict each other.
    #[error("profile {profile} is inconsistent with variant {variant}")]
    ProfileVariantMismatch {
        /// The declared profile.
        profile: WalletProfile,
        /// The offending variant.
        variant: Variant,
    },
}

/// Malformed attribute registry definitions.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two groups share an identifier.
    #[error("duplicate attribute group \"{0}\"")]
    DuplicateGroup(String),

    /// Two attributes share an identifier.
    #[error("duplicate attribute \"{attribute}\" (second occurrence in group \"{group}\")")]
    DuplicateAttribute {
        /// The attribute identifier.
        attribute: String,
        /// The group holding the duplicate.
        group: String,
    },

    /// A group declares no attributes.
    #[error("attribute group \"{0}\" has no attributes")]
    EmptyGroup(String),

    /// An attribute weight is not a finite positive number.
    #[error("attribute \"{attribute}\" has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight {
        /// The attribute identifier.
        attribute: String,
        /// The rejected weight.
        weight: f64,
    },
}
