//! # Wallet Fact Documents
//!
//! A [`WalletFacts`] document is the single input to a rating run: wallet
//! metadata, the declared [`WalletProfile`], the set of implemented
//! [`Variant`]s, and the variant-dependent [`WalletFeatures`].
//!
//! ## Input Contract
//!
//! [`WalletFacts::validate`] enforces:
//!
//! - the wallet id is non-empty and at least one variant is implemented;
//! - the `hardware` profile is used exactly when the only variant is
//!   `hardware`;
//! - every per-variant feature map has an entry (possibly `null`) for every
//!   implemented variant, and none for unimplemented ones.
//!
//! Nothing is defaulted: a data author who does not know a per-variant fact
//! writes `null`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FactsError, RatingError};
use crate::features::{ResolvedFeatures, WalletFeatures};
use crate::variant::Variant;

/// Stable wallet identifier, e.g. `rabby`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    /// Create a wallet id, rejecting empty or whitespace-only strings.
    pub fn new(id: impl Into<String>) -> Result<Self, FactsError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(FactsError::EmptyWalletId);
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive wallet metadata. Not used by any evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetadata {
    /// Stable identifier.
    pub id: WalletId,
    /// Human-readable name.
    pub display_name: String,
    /// Project homepage.
    #[serde(default)]
    pub url: Option<String>,
    /// Primary source repository, when one is disclosed.
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// The wallet's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletProfile {
    /// General-purpose software wallet.
    Generic,
    /// Payments-focused software wallet.
    Payments,
    /// Dedicated hardware signer.
    Hardware,
}

impl WalletProfile {
    /// Return all profiles in declaration order.
    pub fn all() -> &'static [WalletProfile] {
        &[Self::Generic, Self::Payments, Self::Hardware]
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Payments => "payments",
            Self::Hardware => "hardware",
        }
    }
}

impl fmt::Display for WalletProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete input document for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletFacts {
    /// Descriptive metadata.
    pub metadata: WalletMetadata,
    /// Declared wallet type.
    pub profile: WalletProfile,
    /// Implemented platform variants.
    pub variants: BTreeSet<Variant>,
    /// Variant-dependent facts.
    #[serde(default)]
    pub features: WalletFeatures,
}

impl WalletFacts {
    /// Check the document against the input contract.
    ///
    /// Returns the first violation found, in this order: wallet id,
    /// variant set, profile consistency, per-variant coverage (schema
    /// order, then variant order).
    pub fn validate(&self) -> Result<(), FactsError> {
        if self.metadata.id.as_str().trim().is_empty() {
            return Err(FactsError::EmptyWalletId);
        }
        if self.variants.is_empty() {
            return Err(FactsError::NoVariants {
                wallet: self.metadata.id.to_string(),
            });
        }
        self.validate_profile()?;

        for coverage in self.features.coverage() {
            let Some(covered) = coverage.covered else {
                continue;
            };
            if let Some(&variant) = self.variants.difference(&covered).next() {
                return Err(FactsError::MissingVariantEntry {
                    feature: coverage.feature,
                    variant,
                });
            }
            if let Some(&variant) = covered.difference(&self.variants).next() {
                return Err(FactsError::UnsupportedVariantEntry {
                    feature: coverage.feature,
                    variant,
                });
            }
            if coverage.all_unknown {
                tracing::warn!(
                    wallet = %self.metadata.id,
                    feature = coverage.feature,
                    "per-variant feature has only null entries; consider marking it unassessed"
                );
            }
        }
        Ok(())
    }

    fn validate_profile(&self) -> Result<(), FactsError> {
        let mismatch = |variant| FactsError::ProfileVariantMismatch {
            profile: self.profile,
            variant,
        };
        match self.profile {
            WalletProfile::Hardware => {
                if let Some(&other) = self.variants.iter().find(|&&v| v != Variant::Hardware) {
                    return Err(mismatch(other));
                }
            }
            WalletProfile::Generic | WalletProfile::Payments => {
                if self.variants.contains(&Variant::Hardware) {
                    return Err(mismatch(Variant::Hardware));
                }
            }
        }
        Ok(())
    }

    /// Whether the wallet implements `variant`.
    pub fn implements(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    /// Resolve every feature for one implemented variant.
    ///
    /// Fails with [`RatingError::UnsupportedVariant`] if the wallet does not
    /// implement `variant`.
    pub fn resolve(&self, variant: Variant) -> Result<ResolvedFacts, RatingError> {
        if !self.implements(variant) {
            return Err(RatingError::UnsupportedVariant {
                wallet: self.metadata.id.to_string(),
                variant,
            });
        }
        Ok(ResolvedFacts {
            metadata: self.metadata.clone(),
            profile: self.profile,
            variant,
            features: self.features.resolve(variant),
        })
    }
}

/// A wallet's facts collapsed onto one variant.
///
/// This is the only input an attribute evaluator sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFacts {
    /// Wallet metadata.
    pub metadata: WalletMetadata,
    /// Declared wallet type.
    pub profile: WalletProfile,
    /// The variant these facts describe.
    pub variant: Variant,
    /// Feature values for `variant`.
    pub features: ResolvedFeatures,
}

impl ResolvedFacts {
    /// The wallet identifier.
    pub fn wallet_id(&self) -> &WalletId {
        &self.metadata.id
    }
}
