//! # Platform Variants & Variant-Dependent Features
//!
//! A logical wallet may ship on several platforms ([`Variant`]s) whose
//! behavior diverges. Every input fact is therefore a [`VariantFeature`]:
//!
//! ```text
//! Unassessed              → nobody has looked at this fact yet
//! Uniform(T)              → same value on every variant
//! PerVariant({v: T|null}) → one entry per variant; null = explicitly unknown
//! ```
//!
//! Resolving a feature against a variant yields `Option<&T>`, where `None`
//! means "not assessed for that variant".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A distinct platform implementation of one logical wallet.
///
/// Declaration order is the canonical iteration order everywhere in the
/// engine, so results never depend on map or input ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Browser extension.
    Browser,
    /// Desktop application.
    Desktop,
    /// Mobile application.
    Mobile,
    /// Wallet embedded in another application (SDK, in-app wallet).
    Embedded,
    /// Dedicated signing hardware.
    Hardware,
}

impl Variant {
    /// Return all variants in canonical order.
    pub fn all() -> &'static [Variant] {
        &[
            Self::Browser,
            Self::Desktop,
            Self::Mobile,
            Self::Embedded,
            Self::Hardware,
        ]
    }

    /// The total number of variants.
    pub const COUNT: usize = 5;

    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Embedded => "embedded",
            Self::Hardware => "hardware",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fact that may be unassessed, uniform across variants, or variant-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFeature<T> {
    /// Not assessed on any variant.
    Unassessed,
    /// The same value on every variant.
    Uniform(T),
    /// One entry per variant. A `None` entry is an explicit unknown.
    PerVariant(BTreeMap<Variant, Option<T>>),
}

impl<T> Default for VariantFeature<T> {
    fn default() -> Self {
        Self::Unassessed
    }
}

impl<T> VariantFeature<T> {
    /// Resolve the feature for one variant.
    ///
    /// - `Unassessed` resolves to `None`.
    /// - `Uniform(v)` resolves to `Some(v)` for every variant.
    /// - `PerVariant(map)` resolves to the variant's entry; a missing entry
    ///   or an explicit `null` resolves to `None`.
    ///
    /// Whether `variant` is implemented by the wallet is checked one level
    /// up, by [`WalletFacts::resolve`](crate::WalletFacts::resolve).
    pub fn resolve(&self, variant: Variant) -> Option<&T> {
        match self {
            Self::Unassessed => None,
            Self::Uniform(value) => Some(value),
            Self::PerVariant(map) => map.get(&variant).and_then(Option::as_ref),
        }
    }

    /// Resolve and clone the value for one variant.
    pub fn resolve_cloned(&self, variant: Variant) -> Option<T>
    where
        T: Clone,
    {
        self.resolve(variant).cloned()
    }

    /// The set of variants named by a per-variant map, if this is one.
    ///
    /// Used by fact-document validation; uniform and unassessed features
    /// cover every variant implicitly.
    pub fn per_variant_coverage(&self) -> Option<BTreeSet<Variant>> {
        match self {
            Self::PerVariant(map) => Some(map.keys().copied().collect()),
            Self::Unassessed | Self::Uniform(_) => None,
        }
    }

    /// Whether every per-variant entry is an explicit unknown.
    pub fn is_effectively_unassessed(&self) -> bool {
        match self {
            Self::Unassessed => true,
            Self::Uniform(_) => false,
            Self::PerVariant(map) => map.values().all(Option::is_none),
        }
    }
}
