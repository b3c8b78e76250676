//! # Attribute Contract and Registry
//!
//! An [`Attribute`] is one independently evaluated rating criterion. The
//! engine depends only on this contract; concrete attributes are supplied
//! by catalog authors.
//!
//! Attributes are arranged in an [`AttributeRegistry`]: an ordered list of
//! weighted [`AttributeGroup`]s, built once at startup and validated at
//! construction. Registry order is the iteration order of every evaluation
//! tree, report, and score.

use std::collections::BTreeMap;
use std::fmt;

use rating_core::{RatingError, RegistryError, ResolvedFacts};
use serde::Serialize;

use crate::aggregate::pick_worst_rating;
use crate::id::{AttributeId, GroupId};
use crate::value::Evaluation;

/// Presentation-only attribute description. Never read by engine logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeMetadata {
    /// Short human-readable name.
    pub display_name: String,
    /// The question the attribute answers, e.g. "Is the source code public?".
    pub question: String,
    /// Why users should care.
    pub why_it_matters: String,
}

/// A rating criterion.
///
/// ## Contract
///
/// - [`evaluate`](Attribute::evaluate) is pure and total over every
///   combination of missing facts: missing data yields `Unrated`, an
///   inapplicable profile or variant yields `Exempt`. `Err` is reserved for
///   facts contradicting the wallet's declared profile or variant.
/// - [`aggregate`](Attribute::aggregate) combines per-variant evaluations
///   (in [`Variant`](rating_core::Variant) order) into the overall one. The
///   default is [`pick_worst_rating`]; attributes that carry structured
///   detail may override it to merge detail from the other variants.
pub trait Attribute: Send + Sync + fmt::Debug {
    /// Stable identifier, unique across the registry.
    fn id(&self) -> AttributeId;

    /// Presentation metadata.
    fn metadata(&self) -> AttributeMetadata;

    /// Rate one variant's resolved facts.
    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError>;

    /// Combine per-variant evaluations into the overall evaluation.
    fn aggregate(&self, evaluations: &[Evaluation]) -> Result<Evaluation, RatingError> {
        pick_worst_rating(&self.id(), evaluations)
    }
}

/// An attribute with its weight inside a group.
#[derive(Debug)]
pub struct WeightedAttribute {
    id: AttributeId,
    weight: f64,
    attribute: Box<dyn Attribute>,
}

impl WeightedAttribute {
    /// The attribute's identifier, cached at registration.
    pub fn id(&self) -> &AttributeId {
        &self.id
    }

    /// The attribute's weight in its group.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The attribute itself.
    pub fn attribute(&self) -> &dyn Attribute {
        self.attribute.as_ref()
    }
}

/// A named, weighted collection of attributes sharing a category.
#[derive(Debug)]
pub struct AttributeGroup {
    id: GroupId,
    display_name: String,
    attributes: Vec<WeightedAttribute>,
}

impl AttributeGroup {
    /// Create an empty group. Add attributes with [`with`](Self::with).
    pub fn new(id: impl Into<GroupId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute with the given weight.
    pub fn with(mut self, attribute: impl Attribute + 'static, weight: f64) -> Self {
        self.attributes.push(WeightedAttribute {
            id: attribute.id(),
            weight,
            attribute: Box::new(attribute),
        });
        self
    }

    /// The group identifier.
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[WeightedAttribute] {
        &self.attributes
    }

    /// The weight of an attribute in this group.
    pub fn weight_of(&self, attribute: &str) -> Option<f64> {
        self.attributes
            .iter()
            .find(|a| a.id.as_str() == attribute)
            .map(|a| a.weight)
    }
}

/// The ordered set of attribute groups the engine evaluates.
#[derive(Debug)]
pub struct AttributeRegistry {
    groups: Vec<AttributeGroup>,
    /// attribute id → (group index, attribute index)
    index: BTreeMap<AttributeId, (usize, usize)>,
}

impl AttributeRegistry {
    /// Build a registry, validating:
    ///
    /// - every group has at least one attribute;
    /// - group ids are unique;
    /// - attribute ids are unique across the whole registry;
    /// - every weight is finite and strictly positive.
    pub fn new(groups: Vec<AttributeGroup>) -> Result<Self, RegistryError> {
        let mut index = BTreeMap::new();
        let mut seen_groups = BTreeMap::new();

        for (g, group) in groups.iter().enumerate() {
            if seen_groups.insert(group.id.clone(), g).is_some() {
                return Err(RegistryError::DuplicateGroup(group.id.to_string()));
            }
            if group.attributes.is_empty() {
                return Err(RegistryError::EmptyGroup(group.id.to_string()));
            }
            for (a, weighted) in group.attributes.iter().enumerate() {
                if !weighted.weight.is_finite() || weighted.weight <= 0.0 {
                    return Err(RegistryError::InvalidWeight {
                        attribute: weighted.id.to_string(),
                        weight: weighted.weight,
                    });
                }
                if index.insert(weighted.id.clone(), (g, a)).is_some() {
                    return Err(RegistryError::DuplicateAttribute {
                        attribute: weighted.id.to_string(),
                        group: group.id.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            groups = groups.len(),
            attributes = index.len(),
            "attribute registry built"
        );
        Ok(Self { groups, index })
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[AttributeGroup] {
        &self.groups
    }

    /// Look up a group by id.
    pub fn group(&self, id: &str) -> Option<&AttributeGroup> {
        self.groups.iter().find(|g| g.id.as_str() == id)
    }

    /// Every attribute with its group, in registry order.
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeGroup, &WeightedAttribute)> {
        self.groups
            .iter()
            .flat_map(|g| g.attributes.iter().map(move |a| (g, a)))
    }

    /// Look up an attribute by id.
    pub fn attribute(&self, id: &str) -> Option<&WeightedAttribute> {
        let &(g, a) = self.index.get(id)?;
        Some(&self.groups[g].attributes[a])
    }

    /// The group holding an attribute.
    pub fn group_of(&self, id: &str) -> Option<&AttributeGroup> {
        let &(g, _) = self.index.get(id)?;
        Some(&self.groups[g])
    }

    /// Number of registered attributes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the registry has no attributes.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal attributes for engine unit tests.

    use super::*;
    use crate::value::Value;
    use rating_core::Rating;

    /// Rates every variant with a fixed rating per variant, defaulting to
    /// `fallback`.
    #[derive(Debug)]
    pub struct FixedAttribute {
        pub id: &'static str,
        pub fallback: Rating,
        pub per_variant: Vec<(rating_core::Variant, Rating, &'static str)>,
    }

    impl FixedAttribute {
        pub fn new(id: &'static str, fallback: Rating) -> Self {
            Self {
                id,
                fallback,
                per_variant: Vec::new(),
            }
        }

        pub fn on(
            mut self,
            variant: rating_core::Variant,
            rating: Rating,
            outcome: &'static str,
        ) -> Self {
            self.per_variant.push((variant, rating, outcome));
            self
        }
    }

    impl Attribute for FixedAttribute {
        fn id(&self) -> AttributeId {
            AttributeId::from(self.id)
        }

        fn metadata(&self) -> AttributeMetadata {
            AttributeMetadata {
                display_name: self.id.to_string(),
                question: format!("{}?", self.id),
                why_it_matters: String::new(),
            }
        }

        fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
            let (rating, outcome) = self
                .per_variant
                .iter()
                .find(|(v, _, _)| *v == facts.variant)
                .map(|(_, r, o)| (*r, *o))
                .unwrap_or((self.fallback, "fixed"));
            Ok(Evaluation::new(Value::new(outcome, rating, self.id)))
        }
    }
}
