//! # Wallet Feature Schema
//!
//! The typed facts a data author records about a wallet. Every field of
//! [`WalletFeatures`] is a [`VariantFeature`], so each fact can be
//! unassessed, uniform, or platform-specific. [`ResolvedFeatures`] is the
//! same schema collapsed onto one variant, with `None` meaning "not assessed
//! for this variant".
//!
//! The schema is grouped the same way the attribute catalog is grouped, but
//! nothing in the engine depends on that correspondence.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::variant::{Variant, VariantFeature};

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

/// Light clients capable of verifying L1 chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightClient {
    /// a16z Helios.
    Helios,
    /// Nimbus light client.
    Nimbus,
    /// Lodestar light client.
    Lodestar,
}

/// Whether and how the wallet verifies chain state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// The embedded light client, if any.
    #[serde(default)]
    pub light_client: Option<LightClient>,
}

/// Hardware signers the wallet can drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareWalletSupport {
    /// Supported device families, e.g. `ledger`, `trezor`.
    #[serde(default)]
    pub supported: BTreeSet<String>,
    /// Whether transactions are shown in decoded form on the device.
    /// `None` when not yet assessed.
    #[serde(default)]
    pub clear_signing: Option<bool>,
}

/// One completed third-party security audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAudit {
    /// Auditing firm.
    pub auditor: String,
    /// Date the report was published.
    pub date: NaiveDate,
    /// Flaws reported and not yet fixed.
    #[serde(default)]
    pub unaddressed_flaws: Vec<String>,
    /// Link to the published report.
    #[serde(default)]
    pub report_url: Option<String>,
}

/// Security-related facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityFeatures {
    /// Chain-state verification capability.
    pub chain_verification: VariantFeature<ChainVerification>,
    /// Hardware signer support.
    pub hardware_wallets: VariantFeature<HardwareWalletSupport>,
    /// Published security audits.
    pub security_audits: VariantFeature<Vec<SecurityAudit>>,
}

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// A third party receiving user data from the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLeak {
    /// The receiving entity (RPC provider, analytics vendor, ...).
    pub entity: String,
    /// Whether the entity sees the user's IP address.
    #[serde(default)]
    pub ip_address: bool,
    /// Whether the entity sees the user's wallet address.
    #[serde(default)]
    pub wallet_address: bool,
}

impl DataLeak {
    /// Whether this entity can correlate IP address and wallet address.
    pub fn correlates(&self) -> bool {
        self.ip_address && self.wallet_address
    }
}

/// Data the wallet shares with third parties by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCollection {
    /// Entities receiving user data.
    #[serde(default)]
    pub leaks: Vec<DataLeak>,
}

/// On-chain transaction privacy capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPrivacy {
    /// Stealth address support.
    #[serde(default)]
    pub stealth_addresses: bool,
    /// Shielded / private transfer support.
    #[serde(default)]
    pub private_transfers: bool,
}

/// Privacy-related facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyFeatures {
    /// Default data sharing.
    pub data_collection: VariantFeature<DataCollection>,
    /// Transaction privacy capabilities.
    pub transaction_privacy: VariantFeature<TransactionPrivacy>,
}

// ---------------------------------------------------------------------------
// Self-sovereignty
// ---------------------------------------------------------------------------

/// How the wallet gets transactions included on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSubmission {
    /// Whether the user can broadcast through a node of their choosing.
    #[serde(default)]
    pub self_broadcast: bool,
    /// Whether L2 force-withdrawal is supported. `None` when the wallet has
    /// no L2 support to assess.
    #[serde(default)]
    pub l2_force_withdrawal: Option<bool>,
}

/// Self-sovereignty facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfSovereigntyFeatures {
    /// Whether the user can point the wallet at their own RPC node.
    pub custom_rpc: VariantFeature<bool>,
    /// Transaction inclusion guarantees.
    pub transaction_submission: VariantFeature<TransactionSubmission>,
}

// ---------------------------------------------------------------------------
// Transparency
// ---------------------------------------------------------------------------

/// Source code license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum License {
    /// MIT.
    Mit,
    /// Apache 2.0.
    #[serde(rename = "APACHE_2_0")]
    Apache2,
    /// GNU GPL v3.
    #[serde(rename = "GPL_3_0")]
    Gpl3,
    /// GNU AGPL v3.
    #[serde(rename = "AGPL_3_0")]
    Agpl3,
    /// Mozilla Public License 2.0.
    #[serde(rename = "MPL_2_0")]
    Mpl2,
    /// Business Source License 1.1 (source-available, converts later).
    #[serde(rename = "BUSL_1_1")]
    Busl11,
    /// All rights reserved.
    Proprietary,
}

impl License {
    /// Whether this is a free and open-source license.
    pub fn is_foss(self) -> bool {
        match self {
            Self::Mit | Self::Apache2 | Self::Gpl3 | Self::Agpl3 | Self::Mpl2 => true,
            Self::Busl11 | Self::Proprietary => false,
        }
    }

    /// Whether source is available under terms that later convert to FOSS.
    pub fn is_source_available(self) -> bool {
        matches!(self, Self::Busl11)
    }
}

/// Where the wallet's source code can be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "visibility")]
pub enum SourceVisibility {
    /// Publicly readable repository.
    Public {
        /// Repository URL.
        repository: String,
    },
    /// Source code is not published.
    Private,
}

/// Transparency facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyFeatures {
    /// Source code license.
    pub license: VariantFeature<License>,
    /// Source code visibility.
    pub source_visibility: VariantFeature<SourceVisibility>,
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// Injected browser provider standards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserProvider {
    /// EIP-1193 provider API.
    #[serde(default)]
    pub eip1193: bool,
    /// EIP-6963 multi-provider discovery.
    #[serde(default)]
    pub eip6963: bool,
}

/// Ecosystem integration facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationFeatures {
    /// Browser provider standards.
    pub browser_provider: VariantFeature<BrowserProvider>,
}

// ---------------------------------------------------------------------------
// Aggregate schema
// ---------------------------------------------------------------------------

/// The complete variant-dependent fact schema for one wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletFeatures {
    /// Security facts.
    pub security: SecurityFeatures,
    /// Privacy facts.
    pub privacy: PrivacyFeatures,
    /// Self-sovereignty facts.
    pub self_sovereignty: SelfSovereigntyFeatures,
    /// Transparency facts.
    pub transparency: TransparencyFeatures,
    /// Integration facts.
    pub integration: IntegrationFeatures,
}

/// Per-variant coverage of one feature, as seen by validation.
pub struct FeatureCoverage {
    /// Dotted feature path.
    pub feature: &'static str,
    /// Variants named by the per-variant map, `None` if not per-variant.
    pub covered: Option<BTreeSet<Variant>>,
    /// Whether every per-variant entry is an explicit unknown.
    pub all_unknown: bool,
}

fn coverage<T>(feature: &'static str, value: &VariantFeature<T>) -> FeatureCoverage {
    FeatureCoverage {
        feature,
        covered: value.per_variant_coverage(),
        all_unknown: matches!(value, VariantFeature::PerVariant(_))
            && value.is_effectively_unassessed(),
    }
}

impl WalletFeatures {
    /// Per-variant coverage of every feature in schema order.
    ///
    /// New fields must be listed here, or validation silently skips them.
    pub fn coverage(&self) -> Vec<FeatureCoverage> {
        vec![
            coverage("security.chain_verification", &self.security.chain_verification),
            coverage("security.hardware_wallets", &self.security.hardware_wallets),
            coverage("security.security_audits", &self.security.security_audits),
            coverage("privacy.data_collection", &self.privacy.data_collection),
            coverage("privacy.transaction_privacy", &self.privacy.transaction_privacy),
            coverage("self_sovereignty.custom_rpc", &self.self_sovereignty.custom_rpc),
            coverage(
                "self_sovereignty.transaction_submission",
                &self.self_sovereignty.transaction_submission,
            ),
            coverage("transparency.license", &self.transparency.license),
            coverage(
                "transparency.source_visibility",
                &self.transparency.source_visibility,
            ),
            coverage(
                "integration.browser_provider",
                &self.integration.browser_provider,
            ),
        ]
    }

    /// Collapse every feature onto one variant.
    pub fn resolve(&self, variant: Variant) -> ResolvedFeatures {
        ResolvedFeatures {
            chain_verification: self.security.chain_verification.resolve_cloned(variant),
            hardware_wallets: self.security.hardware_wallets.resolve_cloned(variant),
            security_audits: self.security.security_audits.resolve_cloned(variant),
            data_collection: self.privacy.data_collection.resolve_cloned(variant),
            transaction_privacy: self.privacy.transaction_privacy.resolve_cloned(variant),
            custom_rpc: self.self_sovereignty.custom_rpc.resolve_cloned(variant),
            transaction_submission: self
                .self_sovereignty
                .transaction_submission
                .resolve_cloned(variant),
            license: self.transparency.license.resolve_cloned(variant),
            source_visibility: self.transparency.source_visibility.resolve_cloned(variant),
            browser_provider: self.integration.browser_provider.resolve_cloned(variant),
        }
    }
}

/// [`WalletFeatures`] resolved for a single variant.
///
/// `None` means the fact was not assessed for this variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFeatures {
    /// Chain-state verification capability.
    pub chain_verification: Option<ChainVerification>,
    /// Hardware signer support.
    pub hardware_wallets: Option<HardwareWalletSupport>,
    /// Published security audits.
    pub security_audits: Option<Vec<SecurityAudit>>,
    /// Default data sharing.
    pub data_collection: Option<DataCollection>,
    /// Transaction privacy capabilities.
    pub transaction_privacy: Option<TransactionPrivacy>,
    /// Custom RPC support.
    pub custom_rpc: Option<bool>,
    /// Transaction inclusion guarantees.
    pub transaction_submission: Option<TransactionSubmission>,
    /// Source code license.
    pub license: Option<License>,
    /// Source code visibility.
    pub source_visibility: Option<SourceVisibility>,
    /// Browser provider standards.
    pub browser_provider: Option<BrowserProvider>,
}
