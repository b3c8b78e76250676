//! # CLI Command Tests
//!
//! Drives the `wrate` subcommand handlers against the fixture documents,
//! the same code paths the binary dispatches to.

use std::path::{Path, PathBuf};

use rating_cli::attributes::{run_attributes_to, AttributesArgs};
use rating_cli::config::{CliConfig, OutputFormat};
use rating_cli::rate::{run_rate_to, RateArgs};
use rating_cli::validate::{run_validate_to, ValidateArgs};
use rating_cli::{EXIT_OK, EXIT_REJECTED, EXIT_UNRATED};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn rate(files: &[&str], output: OutputFormat, config: &CliConfig) -> (u8, String) {
    let args = RateArgs {
        facts: files.iter().map(|f| fixture(f)).collect(),
        output: Some(output),
        pretty: false,
    };
    let mut buf = Vec::new();
    let code = run_rate_to(&args, config, &mut buf).unwrap();
    (code, String::from_utf8(buf).unwrap())
}

#[test]
fn rate_json_report_covers_every_document() {
    let (code, out) = rate(&["fox.yaml", "vault.json"], OutputFormat::Json, &CliConfig::default());
    assert_eq!(code, EXIT_OK);

    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    let generated_at = report["generated_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(generated_at).is_ok());

    let wallets = report["wallets"].as_array().unwrap();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0]["metadata"]["id"], "fox");
    assert_eq!(wallets[1]["metadata"]["id"], "vault");
    assert_eq!(
        wallets[0]["ladders"]["software_stages"]["result"],
        serde_json::json!({"result": "stage", "index": 1, "id": "stage_1"})
    );
    assert!(wallets[0]["facts_digest"]
        .as_str()
        .unwrap()
        .starts_with("sha256:"));
}

#[test]
fn rate_text_report_shows_specificity_and_ladders() {
    let (code, out) = rate(&["fox.yaml"], OutputFormat::Text, &CliConfig::default());
    assert_eq!(code, EXIT_OK);
    assert!(out.contains("Fox Wallet (fox) [generic] browser, desktop, mobile"));
    assert!(out.contains("mobile=UNIQUE_TO_VARIANT"));
    assert!(out.contains("stage 1 (stage_1)"));
    assert!(out.contains("not applicable"));
}

#[test]
fn rate_rejects_invalid_document_but_reports_the_rest() {
    let (code, out) = rate(&["gap.yaml", "fox.yaml"], OutputFormat::Json, &CliConfig::default());
    assert_eq!(code, EXIT_REJECTED);

    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["wallets"].as_array().unwrap().len(), 1);
    let rejected = &report["rejected"][0];
    assert!(rejected["path"].as_str().unwrap().ends_with("gap.yaml"));
    assert!(rejected["error"]
        .as_str()
        .unwrap()
        .contains("self_sovereignty.custom_rpc"));
}

#[test]
fn fail_on_unrated_flags_the_hardware_wallet() {
    let config = CliConfig {
        fail_on_unrated: true,
        ..CliConfig::default()
    };
    let (code, _) = rate(&["fox.yaml"], OutputFormat::Text, &config);
    assert_eq!(code, EXIT_OK);
    let (code, _) = rate(&["vault.json"], OutputFormat::Text, &config);
    assert_eq!(code, EXIT_UNRATED);
}

#[test]
fn config_file_drives_output_and_ladders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrate.yaml");
    std::fs::write(&path, "output: json\npretty: true\nladders: [software_stages]\n").unwrap();
    let config = CliConfig::load(Some(&path)).unwrap();

    let args = RateArgs {
        facts: vec![fixture("fox.yaml")],
        output: None,
        pretty: false,
    };
    let mut buf = Vec::new();
    run_rate_to(&args, &config, &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();

    assert!(out.contains("\n  \"wallets\""), "pretty JSON expected");
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ladders = report["wallets"][0]["ladders"].as_object().unwrap();
    assert_eq!(ladders.keys().collect::<Vec<_>>(), vec!["software_stages"]);
}

#[test]
fn validate_reports_each_fixture() {
    let args = ValidateArgs {
        facts: vec![fixture("fox.yaml"), fixture("vault.json"), fixture("gap.yaml")],
    };
    let mut buf = Vec::new();
    let code = run_validate_to(&args, &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();

    assert_eq!(code, EXIT_REJECTED);
    assert!(out.contains("(fox)"));
    assert!(out.contains("(vault)"));
    assert!(out.contains("INVALID"));
    assert!(out.contains("3 document(s) checked, 1 invalid"));
}

#[test]
fn attributes_listing_matches_registry() {
    let registry = rating_catalog::default_registry().unwrap();
    let mut buf = Vec::new();
    let args = AttributesArgs {
        output: Some(OutputFormat::Json),
    };
    assert_eq!(run_attributes_to(&args, &CliConfig::default(), &mut buf).unwrap(), EXIT_OK);

    let listing: Vec<serde_json::Value> = serde_json::from_slice(&buf).unwrap();
    assert_eq!(listing.len(), registry.len());
    for (entry, (group, weighted)) in listing.iter().zip(registry.attributes()) {
        assert_eq!(entry["group"], group.id().as_str());
        assert_eq!(entry["attribute"], weighted.id().as_str());
    }
}
