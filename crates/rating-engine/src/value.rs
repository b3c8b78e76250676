//! # Values and Evaluations
//!
//! A [`Value`] is one attribute's result for one entity: an outcome id, a
//! [`Rating`], a short explanation, and an optional attribute-specific
//! [`ValueDetail`] payload. An [`Evaluation`] wraps a value with supporting
//! prose and evidence references.
//!
//! ## Attribute-Specific Payloads
//!
//! Each attribute may attach its own detail type. Generic code (aggregation,
//! scoring, ladders) never looks inside; presentation code narrows with
//! [`Value::detail`], a type-checked downcast. The stable [`ValueDetail::tag`]
//! identifies the payload shape once serialized.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rating_core::Rating;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::id::OutcomeId;

/// Attribute-specific structured data carried by a [`Value`].
pub trait ValueDetail: fmt::Debug + Send + Sync + 'static {
    /// Stable tag naming the payload shape, e.g. `address_correlation`.
    fn tag(&self) -> &'static str;

    /// Upcast for [`Value::detail`] narrowing. Implementations return `self`.
    fn as_any(&self) -> &dyn Any;

    /// JSON rendering used when the value is serialized.
    fn to_json(&self) -> serde_json::Value;
}

/// One attribute's result for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct Value {
    /// Why the rating was reached.
    pub outcome: OutcomeId,
    /// The rating.
    pub rating: Rating,
    /// One-line explanation.
    pub short_explanation: String,
    /// Optional presentation icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Replaces the rating's numeric mapping in group scoring. Clamped to
    /// `[0, 1]` when read through [`Value::numeric_score`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_override: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_detail"
    )]
    detail: Option<Arc<dyn ValueDetail>>,
}

impl Value {
    /// Create a value with no icon, override, or detail.
    pub fn new(
        outcome: impl Into<OutcomeId>,
        rating: Rating,
        short_explanation: impl Into<String>,
    ) -> Self {
        Self {
            outcome: outcome.into(),
            rating,
            short_explanation: short_explanation.into(),
            icon: None,
            score_override: None,
            detail: None,
        }
    }

    /// Attach a presentation icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Attach a score override.
    pub fn with_score_override(mut self, score: f64) -> Self {
        self.score_override = Some(score);
        self
    }

    /// Attach an attribute-specific payload.
    pub fn with_detail(mut self, detail: impl ValueDetail) -> Self {
        self.detail = Some(Arc::new(detail));
        self
    }

    /// Replace the payload, keeping everything else.
    pub fn replace_detail(&mut self, detail: impl ValueDetail) {
        self.detail = Some(Arc::new(detail));
    }

    /// Narrow the payload to a concrete type.
    ///
    /// Returns `None` if there is no payload or it is of another type.
    pub fn detail<T: ValueDetail>(&self) -> Option<&T> {
        self.detail.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// The payload's tag, if any.
    pub fn detail_tag(&self) -> Option<&'static str> {
        self.detail.as_deref().map(ValueDetail::tag)
    }

    /// Numeric contribution to group scoring.
    ///
    /// `None` for out-of-band ratings. Otherwise the clamped score override
    /// if present, else the rating's numeric mapping.
    pub fn numeric_score(&self) -> Option<f64> {
        if self.rating.is_out_of_band() {
            return None;
        }
        match self.score_override {
            Some(score) if score.is_finite() => Some(score.clamp(0.0, 1.0)),
            _ => self.rating.numeric_score(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let same_detail = match (&self.detail, &other.detail) {
            (None, None) => true,
            (Some(a), Some(b)) => a.tag() == b.tag() && a.to_json() == b.to_json(),
            _ => false,
        };
        self.outcome == other.outcome
            && self.rating == other.rating
            && self.short_explanation == other.short_explanation
            && self.icon == other.icon
            && self.score_override == other.score_override
            && same_detail
    }
}

fn serialize_detail<S: Serializer>(
    detail: &Option<Arc<dyn ValueDetail>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match detail {
        Some(detail) => {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("tag", detail.tag())?;
            map.serialize_entry("data", &detail.to_json())?;
            map.end()
        }
        None => serializer.serialize_none(),
    }
}

/// Evidence supporting an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Source URLs.
    pub urls: Vec<String>,
    /// What the sources show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Reference {
    /// A reference to a single URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            explanation: None,
        }
    }
}

/// A [`Value`] with supporting prose and evidence.
///
/// Produced once per (attribute, resolved variant), and once more per
/// attribute by cross-variant aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// The rated value.
    pub value: Value,
    /// Longer explanation of the rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// What the wallet could change to rate higher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_to_improve: Option<String>,
    /// Impact on the user of the current state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Evidence references.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Evaluation {
    /// Wrap a value with no supporting material.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            details: None,
            how_to_improve: None,
            impact: None,
            references: Vec::new(),
        }
    }

    /// An `Unrated` evaluation with the conventional `unrated` outcome id.
    pub fn unrated(short_explanation: impl Into<String>) -> Self {
        Self::new(Value::new("unrated", Rating::Unrated, short_explanation))
    }

    /// An `Exempt` evaluation with the conventional `exempt` outcome id.
    pub fn exempt(short_explanation: impl Into<String>) -> Self {
        Self::new(Value::new("exempt", Rating::Exempt, short_explanation))
    }

    /// Attach a longer explanation.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach improvement guidance.
    pub fn with_how_to_improve(mut self, how: impl Into<String>) -> Self {
        self.how_to_improve = Some(how.into());
        self
    }

    /// Attach an impact note.
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Attach an evidence reference.
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Shorthand for `self.value.rating`.
    pub fn rating(&self) -> Rating {
        self.value.rating
    }

    /// Shorthand for `self.value.outcome`.
    pub fn outcome(&self) -> &OutcomeId {
        &self.value.outcome
    }
}
