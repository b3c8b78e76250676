//! # Identifiers
//!
//! String newtypes for the stable identifiers the engine keys on. They
//! deref to `str` so lookups can take plain string slices.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Why a rating was reached, e.g. `light_client_helios`. Two evaluations
    /// with the same outcome id are considered equivalent for specificity.
    OutcomeId
);

string_id!(
    /// Stable attribute identifier, unique across the registry.
    AttributeId
);

string_id!(
    /// Stable attribute group identifier, e.g. `security`.
    GroupId
);

string_id!(
    /// Stable ladder identifier, e.g. `software_stages`.
    LadderId
);
