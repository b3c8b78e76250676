//! Transparency attributes.

use rating_core::features::{License, SourceVisibility as Visibility};
use rating_core::{Rating, RatingError, ResolvedFacts};
use rating_engine::{Attribute, AttributeId, AttributeMetadata, Evaluation, Reference};

use crate::{metadata, rated};

/// Is the wallet released under a free and open-source license?
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSource;

impl OpenSource {
    /// Attribute id.
    pub const ID: &'static str = "open_source";
}

impl Attribute for OpenSource {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Open source",
            "Is the wallet's source code under a free and open-source license?",
            "A FOSS license lets anyone fork and maintain the wallet if its team disappears.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        let Some(license) = facts.features.license else {
            return Ok(Evaluation::unrated("The license has not been assessed."));
        };
        Ok(if license.is_foss() {
            rated("foss", Rating::Pass, format!("Licensed under {}.", license_name(license)))
        } else if license.is_source_available() {
            rated(
                "source_available",
                Rating::Partial,
                format!("Source-available under {}, not yet FOSS.", license_name(license)),
            )
            .with_how_to_improve("Relicense under a FOSS license.")
        } else {
            rated("proprietary", Rating::Fail, "All rights reserved.")
                .with_how_to_improve("Release the source code under a FOSS license.")
        })
    }
}

fn license_name(license: License) -> &'static str {
    match license {
        License::Mit => "MIT",
        License::Apache2 => "Apache-2.0",
        License::Gpl3 => "GPL-3.0",
        License::Agpl3 => "AGPL-3.0",
        License::Mpl2 => "MPL-2.0",
        License::Busl11 => "BUSL-1.1",
        License::Proprietary => "a proprietary license",
    }
}

/// Is the wallet's source code publicly readable?
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceVisibility;

impl SourceVisibility {
    /// Attribute id.
    pub const ID: &'static str = "source_visibility";
}

impl Attribute for SourceVisibility {
    fn id(&self) -> AttributeId {
        AttributeId::from(Self::ID)
    }

    fn metadata(&self) -> AttributeMetadata {
        metadata(
            "Source visibility",
            "Is the wallet's source code publicly visible?",
            "Public source lets independent reviewers check what the wallet does with your keys.",
        )
    }

    fn evaluate(&self, facts: &ResolvedFacts) -> Result<Evaluation, RatingError> {
        Ok(match &facts.features.source_visibility {
            None => Evaluation::unrated("Source visibility has not been assessed."),
            Some(Visibility::Public { repository }) => {
                rated("public", Rating::Pass, "The source code is public.")
                    .with_reference(Reference::url(repository.clone()))
            }
            Some(Visibility::Private) => {
                rated("private", Rating::Fail, "The source code is private.")
                    .with_how_to_improve("Publish the source code.")
            }
        })
    }
}
