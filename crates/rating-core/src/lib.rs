#![deny(missing_docs)]

//! # rating-core: Foundational Types for the Wallet Rating Engine
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **Closed rating set.** [`Rating`] has exactly five values. `Exempt` and
//!    `Unrated` are out-of-band outcomes, never points on the pass/fail
//!    spectrum, and every `match` on them is exhaustive.
//!
//! 2. **Explicit variant dependence.** A fact is a [`VariantFeature`]: an
//!    explicit three-way tagged enum (unassessed, uniform, per-variant). No
//!    runtime shape-sniffing decides which case applies.
//!
//! 3. **No implicit defaulting.** [`WalletFacts::validate`] rejects fact
//!    documents where an implemented variant is missing from a per-variant
//!    feature map. Unknown must be stated, not assumed.
//!
//! 4. **[`RatingError`] hierarchy.** Structured errors with `thiserror` for
//!    programming-invariant violations only. Missing data is a [`Rating`],
//!    not an error.

pub mod digest;
pub mod error;
pub mod facts;
pub mod features;
pub mod rating;
pub mod variant;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::ContentDigest;
pub use error::{FactsError, RatingError, RegistryError};
pub use facts::{ResolvedFacts, WalletFacts, WalletId, WalletMetadata, WalletProfile};
pub use features::{ResolvedFeatures, WalletFeatures};
pub use rating::Rating;
pub use variant::{Variant, VariantFeature};
