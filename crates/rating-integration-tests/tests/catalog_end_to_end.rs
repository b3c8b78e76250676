//! # Reference Catalog End-to-End
//!
//! Rates the fixture wallets with the reference registry and ladders, and
//! checks overall ratings, variant specificity, group scores, ladder
//! results, and determinism of the frozen result.

use std::path::{Path, PathBuf};

use rating_catalog::{default_ladders, default_registry, HardwareWalletDetail};
use rating_core::{FactsError, Rating, RatingError, Variant, VariantFeature, WalletFacts};
use rating_engine::{LadderEvaluation, RatedWallet, VariantSpecificity};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> WalletFacts {
    rating_cli::load_facts(&fixture(name)).unwrap()
}

fn rate(facts: &WalletFacts) -> Result<RatedWallet, RatingError> {
    RatedWallet::rate(facts, &default_registry().unwrap(), &default_ladders().unwrap())
}

fn assert_score(wallet: &RatedWallet, group: &str, expected: f64) {
    let score = wallet
        .group_score(group)
        .unwrap_or_else(|| panic!("group {group} has no score"));
    let numeric = score
        .score
        .unwrap_or_else(|| panic!("group {group} has only unrated components"));
    assert!(
        (numeric - expected).abs() < 1e-9,
        "group {group}: expected {expected}, got {numeric}"
    );
}

// ---------------------------------------------------------------------------
// Multi-variant software wallet
// ---------------------------------------------------------------------------

#[test]
fn fox_overall_ratings_take_the_worst_variant() {
    let fox = rate(&load("fox.yaml")).unwrap();

    let chain = fox.evaluation("chain_verification", None).unwrap();
    assert_eq!(chain.rating(), Rating::Fail);
    assert_eq!(chain.outcome().as_str(), "no_light_client");
    assert_eq!(
        fox.evaluation("chain_verification", Some(Variant::Desktop))
            .unwrap()
            .rating(),
        Rating::Pass
    );
    assert_eq!(
        fox.evaluation("transaction_privacy", None).unwrap().rating(),
        Rating::Partial
    );
    assert_eq!(
        fox.evaluation("browser_integration", None).unwrap().rating(),
        Rating::Pass
    );
    assert!(fox.unrated_attributes().is_empty());
}

#[test]
fn fox_specificity_annotates_the_divergent_variant() {
    let fox = rate(&load("fox.yaml")).unwrap();

    assert_eq!(
        fox.specificity(Variant::Mobile, "chain_verification").unwrap(),
        VariantSpecificity::UniqueToVariant
    );
    assert_eq!(
        fox.specificity(Variant::Browser, "chain_verification").unwrap(),
        VariantSpecificity::NotUniversal
    );
    assert_eq!(
        fox.specificity(Variant::Desktop, "open_source").unwrap(),
        VariantSpecificity::AllSame
    );
    assert_eq!(
        fox.specificity(Variant::Browser, "browser_integration").unwrap(),
        VariantSpecificity::OnlyAssessedForThisVariant
    );
    assert_eq!(
        fox.specificity(Variant::Mobile, "browser_integration").unwrap(),
        VariantSpecificity::ExemptForThisVariant
    );
}

#[test]
fn fox_group_scores_are_weighted() {
    let fox = rate(&load("fox.yaml")).unwrap();

    // chain FAIL (w1), hardware PASS (w1), audits PASS (w2).
    assert_score(&fox, "security", 3.0 / 4.0);
    // correlation PASS (w2), transaction privacy PARTIAL (w1).
    assert_score(&fox, "privacy", 2.5 / 3.0);
    assert_score(&fox, "self_sovereignty", 1.0);
    assert_score(&fox, "transparency", 1.0);
    assert_score(&fox, "ecosystem", 1.0);
    assert!(fox
        .group_scores()
        .iter()
        .all(|g| g.score.is_some_and(|s| !s.has_unrated_component)));
}

#[test]
fn fox_stops_below_the_stage_its_mobile_app_fails() {
    let fox = rate(&load("fox.yaml")).unwrap();

    assert_eq!(
        fox.ladder("software_stages"),
        Some(&LadderEvaluation::Stage {
            index: 1,
            id: "stage_1".into()
        })
    );
    assert_eq!(
        fox.ladder("hardware_stages"),
        Some(&LadderEvaluation::NotApplicable)
    );

    let report = fox.ladder_report("software_stages").unwrap();
    assert_eq!(report.stages.len(), 3);
    let sovereignty = &report.stages[2].groups[0];
    let chain = sovereignty
        .criteria
        .iter()
        .find(|c| c.id == "chain_verification")
        .unwrap();
    assert_eq!(chain.rating.as_str(), "FAIL");

    let privacy = report.stages[1]
        .groups
        .iter()
        .find(|g| g.id == "privacy")
        .unwrap();
    assert_eq!(privacy.criteria[0].id, "limited_address_correlation");
    assert_eq!(privacy.criteria[0].rating.as_str(), "PASS");
}

#[test]
fn fox_overall_hardware_detail_is_merged() {
    let fox = rate(&load("fox.yaml")).unwrap();
    let overall = fox.evaluation("hardware_wallet_support", None).unwrap();
    let detail = overall.value.detail::<HardwareWalletDetail>().unwrap();
    assert!(detail.supported.contains("ledger"));
    assert!(detail.supported.contains("trezor"));
}

#[test]
fn querying_an_unimplemented_variant_is_an_error() {
    let fox = rate(&load("fox.yaml")).unwrap();
    let err = fox
        .evaluation("chain_verification", Some(Variant::Hardware))
        .unwrap_err();
    assert!(matches!(
        err,
        RatingError::UnsupportedVariant {
            variant: Variant::Hardware,
            ..
        }
    ));
    assert!(fox.specificity(Variant::Embedded, "open_source").is_err());
}

// ---------------------------------------------------------------------------
// Hardware wallet
// ---------------------------------------------------------------------------

#[test]
fn vault_is_rated_on_the_hardware_ladder_only() {
    let vault = rate(&load("vault.json")).unwrap();

    assert_eq!(
        vault.ladder("software_stages"),
        Some(&LadderEvaluation::NotApplicable)
    );
    // Partial audit is allowed at stage 0; BUSL license fails stage 1.
    assert_eq!(
        vault.ladder("hardware_stages"),
        Some(&LadderEvaluation::Stage {
            index: 0,
            id: "stage_0".into()
        })
    );
}

#[test]
fn vault_exemptions_and_unrated_groups() {
    let vault = rate(&load("vault.json")).unwrap();

    for attribute in [
        "chain_verification",
        "hardware_wallet_support",
        "self_hosted_node",
        "transaction_inclusion",
        "browser_integration",
    ] {
        assert_eq!(
            vault.evaluation(attribute, None).unwrap().rating(),
            Rating::Exempt,
            "{attribute}"
        );
        assert_eq!(
            vault.specificity(Variant::Hardware, attribute).unwrap(),
            VariantSpecificity::ExemptForThisVariant
        );
    }
    assert_eq!(
        vault.specificity(Variant::Hardware, "security_audits").unwrap(),
        VariantSpecificity::OnlyAssessedForThisVariant
    );

    assert_score(&vault, "security", 0.5);
    assert_score(&vault, "transparency", 0.75);
    // Both privacy attributes apply to the device but have no facts.
    let privacy = vault.group_score("privacy").unwrap();
    assert_eq!(privacy.score, None);
    assert!(privacy.has_unrated_component);
    assert_eq!(vault.group_score("self_sovereignty"), None);

    let unrated: Vec<&str> = vault
        .unrated_attributes()
        .into_iter()
        .map(|a| a.as_str())
        .collect();
    assert_eq!(unrated, vec!["address_correlation", "transaction_privacy"]);
}

// ---------------------------------------------------------------------------
// Input contract
// ---------------------------------------------------------------------------

#[test]
fn missing_per_variant_entry_aborts_the_build() {
    let err = rate(&load("gap.yaml")).unwrap_err();
    match err {
        RatingError::InvalidFacts(FactsError::MissingVariantEntry { feature, variant }) => {
            assert_eq!(feature, "self_sovereignty.custom_rpc");
            assert_eq!(variant, Variant::Mobile);
        }
        other => panic!("expected MissingVariantEntry, got {other:?}"),
    }
}

#[test]
fn explicit_null_entry_rates_as_unrated() {
    let mut gap = load("gap.yaml");
    gap.features.self_sovereignty.custom_rpc = VariantFeature::PerVariant(
        [(Variant::Desktop, Some(true)), (Variant::Mobile, None)].into(),
    );
    let rated = rate(&gap).unwrap();
    assert_eq!(
        rated
            .evaluation("self_hosted_node", Some(Variant::Mobile))
            .unwrap()
            .rating(),
        Rating::Unrated
    );
    assert_eq!(
        rated.evaluation("self_hosted_node", None).unwrap().rating(),
        Rating::Unrated
    );
}

#[test]
fn hardware_variant_on_software_profile_is_rejected() {
    let mut fox = load("fox.yaml");
    fox.variants.insert(Variant::Hardware);
    let err = rate(&fox).unwrap_err();
    assert!(matches!(
        err,
        RatingError::InvalidFacts(FactsError::ProfileVariantMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn rating_is_deterministic() {
    let facts = load("fox.yaml");
    let a = rate(&facts).unwrap();
    let b = rate(&facts).unwrap();
    assert_eq!(a.facts_digest(), b.facts_digest());
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[test]
fn changed_facts_change_the_digest() {
    let facts = load("fox.yaml");
    let mut changed = facts.clone();
    changed.metadata.display_name = "Fox".into();
    assert_ne!(
        rate(&facts).unwrap().facts_digest(),
        rate(&changed).unwrap().facts_digest()
    );
}

#[test]
fn yaml_and_json_forms_digest_identically() {
    let yaml = load("fox.yaml");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fox.json");
    std::fs::write(&path, serde_json::to_string(&yaml).unwrap()).unwrap();
    let json = rating_cli::load_facts(&path).unwrap();

    assert_eq!(yaml, json);
    assert_eq!(
        rate(&yaml).unwrap().facts_digest(),
        rate(&json).unwrap().facts_digest()
    );
}

#[test]
fn wallets_rate_independently_across_threads() {
    let registry = default_registry().unwrap();
    let ladders = default_ladders().unwrap();
    let documents = [load("fox.yaml"), load("vault.json")];

    let digests: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = documents
            .iter()
            .map(|facts| {
                let registry = &registry;
                let ladders = &ladders;
                s.spawn(move || {
                    RatedWallet::rate(facts, registry, ladders)
                        .unwrap()
                        .facts_digest()
                        .to_hex()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(digests[0], rate(&documents[0]).unwrap().facts_digest().to_hex());
    assert_eq!(digests[1], rate(&documents[1]).unwrap().facts_digest().to_hex());
}
