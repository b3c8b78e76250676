//! # Rating
//!
//! Defines [`Rating`], the closed outcome set of a single attribute
//! evaluation, together with the two orderings the engine relies on.
//!
//! ```text
//! Severity (pass/fail spectrum):   Fail < Partial < Pass
//! Aggregation rank (worst first):  Unrated < Fail < Partial < Pass
//! Out of band everywhere:          Exempt
//! ```
//!
//! `Exempt` means the attribute does not apply to the wallet. `Unrated` means
//! it applies but there is not enough data to decide. Neither is a point on
//! the severity spectrum, and neither has a numeric score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one attribute evaluation for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    /// The wallet meets the attribute's bar.
    Pass,
    /// The wallet meets part of the bar.
    Partial,
    /// The wallet does not meet the bar.
    Fail,
    /// The attribute does not apply to this wallet or variant.
    Exempt,
    /// The attribute applies, but the facts needed to rate it are missing.
    Unrated,
}

impl Rating {
    /// Return all ratings in declaration order.
    pub fn all() -> &'static [Rating] {
        &[
            Self::Pass,
            Self::Partial,
            Self::Fail,
            Self::Exempt,
            Self::Unrated,
        ]
    }

    /// Position on the pass/fail spectrum. Lower is worse.
    ///
    /// Returns `None` for the out-of-band ratings `Exempt` and `Unrated`.
    pub fn severity(self) -> Option<u8> {
        match self {
            Self::Fail => Some(0),
            Self::Partial => Some(1),
            Self::Pass => Some(2),
            Self::Exempt | Self::Unrated => None,
        }
    }

    /// Rank used by worst-rating-wins aggregation. Lower is worse.
    ///
    /// `Unrated` ranks below `Fail`: an overall rating cannot claim a
    /// variant passes or fails when that variant could not be assessed.
    /// `Exempt` has no rank and is skipped by aggregation.
    pub fn aggregation_rank(self) -> Option<u8> {
        match self {
            Self::Unrated => Some(0),
            Self::Fail => Some(1),
            Self::Partial => Some(2),
            Self::Pass => Some(3),
            Self::Exempt => None,
        }
    }

    /// Numeric contribution to a group score.
    ///
    /// `Pass` = 1.0, `Partial` = 0.5, `Fail` = 0.0. Out-of-band ratings have
    /// no numeric value and must be excluded from score denominators.
    pub fn numeric_score(self) -> Option<f64> {
        match self {
            Self::Pass => Some(1.0),
            Self::Partial => Some(0.5),
            Self::Fail => Some(0.0),
            Self::Exempt | Self::Unrated => None,
        }
    }

    /// Whether this rating sits outside the pass/fail spectrum.
    pub fn is_out_of_band(self) -> bool {
        matches!(self, Self::Exempt | Self::Unrated)
    }

    /// Whether this rating is `Exempt`.
    pub fn is_exempt(self) -> bool {
        matches!(self, Self::Exempt)
    }

    /// Return the worse of two ratings under the aggregation rank.
    ///
    /// `Exempt` is the identity element: it never wins against a ranked
    /// rating. Ties keep `self`.
    pub fn worse_of(self, other: Self) -> Self {
        match (self.aggregation_rank(), other.aggregation_rank()) {
            (None, _) => other,
            (_, None) => self,
            (Some(a), Some(b)) if b < a => other,
            _ => self,
        }
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Partial => "PARTIAL",
            Self::Fail => "FAIL",
            Self::Exempt => "EXEMPT",
            Self::Unrated => "UNRATED",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
