//! # Content Digests
//!
//! SHA-256 digests over a canonical JSON rendering of any serializable
//! value. Used to stamp rating reports with the fact document they were
//! computed from.
//!
//! Canonicalization: the value is first converted to a `serde_json::Value`
//! (whose object maps are sorted by key), then serialized compactly. Two
//! semantically identical documents therefore hash identically regardless
//! of the key order in the source file.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// A SHA-256 digest of canonical JSON content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    bytes: [u8; 32],
}

impl ContentDigest {
    /// Digest the canonical JSON form of `value`.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let canonical = serde_json::to_value(value)?;
        let encoded = serde_json::to_vec(&canonical)?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(Self {
            bytes: hasher.finalize().into(),
        })
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
