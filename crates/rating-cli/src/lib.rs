//! # rating-cli: the `wrate` Command-Line Tool
//!
//! Loads wallet fact documents, rates them against the reference catalog,
//! and prints the result.
//!
//! ## Subcommands
//!
//! - `wrate rate <FACTS>...`: rate one or more wallets.
//! - `wrate validate <FACTS>...`: check fact documents without rating.
//! - `wrate attributes`: list the attribute registry.
//!
//! ```bash
//! wrate rate wallets/rabby.yaml --output json
//! wrate -vv validate wallets/*.yaml
//! ```
//!
//! Handlers return the process exit code so they can be tested without
//! spawning the binary:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | a document failed rating or validation |
//! | 2 | operational error (I/O, parse, config) |
//! | 3 | unrated attributes present with `fail_on_unrated` |

pub mod attributes;
pub mod config;
pub mod rate;
pub mod report;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use rating_core::WalletFacts;

/// All documents processed cleanly.
pub const EXIT_OK: u8 = 0;
/// At least one document was rejected by the engine.
pub const EXIT_REJECTED: u8 = 1;
/// I/O, parse, or configuration failure.
pub const EXIT_OPERATIONAL: u8 = 2;
/// Ratings succeeded but left attributes unrated.
pub const EXIT_UNRATED: u8 = 3;

/// Load a fact document. `.json` files are parsed as JSON, everything else
/// as YAML.
pub fn load_facts(path: &Path) -> Result<WalletFacts> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fact document {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let facts = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON fact document {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML fact document {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), "loaded fact document");
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_core::{Variant, WalletProfile};

    const MINIMAL_YAML: &str = "\
metadata:
  id: minimal
  display_name: Minimal
profile: generic
variants: [desktop]
";

    #[test]
    fn loads_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.yaml");
        std::fs::write(&path, MINIMAL_YAML).unwrap();

        let facts = load_facts(&path).unwrap();
        assert_eq!(facts.metadata.id.as_str(), "minimal");
        assert_eq!(facts.profile, WalletProfile::Generic);
        assert!(facts.variants.contains(&Variant::Desktop));
    }

    #[test]
    fn loads_json_document_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.JSON");
        let document = r#"{
            "metadata": {"id": "j", "display_name": "J"},
            "profile": "hardware",
            "variants": ["hardware"]
        }"#;
        std::fs::write(&path, document).unwrap();

        let facts = load_facts(&path).unwrap();
        assert_eq!(facts.profile, WalletProfile::Hardware);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_facts(Path::new("/nonexistent/wallet.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/wallet.yaml"));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "metadata: [not, a, map]\n").unwrap();

        let err = load_facts(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse YAML"));
    }
}
