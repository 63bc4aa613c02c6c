// ⚙️ Classifier Configuration - Rules as Data
// Lender aliases and pattern lists are static JSON, loaded once at startup.

use crate::error::ConfigError;
use anyhow::{Context as AnyhowContext, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const LENDER_FILE: &str = "mca_lender_list.json";
pub const PATTERN_FILE: &str = "revenue_patterns.json";

const BUILTIN_LENDERS: &str = include_str!("../data/mca_lender_list.json");
const BUILTIN_PATTERNS: &str = include_str!("../data/revenue_patterns.json");

// ============================================================================
// LENDER LIST (mca_lender_list.json)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderEntry {
    /// Canonical lender name reported in `mca_match`
    pub name: String,

    /// Textual variants seen on statements
    pub aliases: Vec<String>,
}

impl LenderEntry {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        LenderEntry {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Array, not a map: registration order breaks alias-length ties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LenderList {
    pub lenders: Vec<LenderEntry>,
}

// ============================================================================
// PATTERN SETS (revenue_patterns.json)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreasuryRules {
    /// IRS, EITC, child tax credit...
    pub program_keywords: Vec<String>,

    /// Bare "treasury" language
    pub generic_terms: Vec<String>,

    /// Treasury wording that is never a tax deposit (treasury management etc.)
    #[serde(default)]
    pub disqualifiers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireRules {
    /// Literal prefixes → FED_WIRE
    pub fed_wire_prefixes: Vec<String>,

    /// Literal prefixes → CHIPS_CREDIT (or BOOK_TRANSFER)
    pub chips_prefixes: Vec<String>,

    /// Remainder after a CHIPS prefix that marks an internal book transfer
    pub book_transfer_patterns: Vec<String>,

    /// Foreign bank / SWIFT / country code signatures
    pub foreign_patterns: Vec<String>,

    /// Plain wire wording → WIRE_TRANSFER
    #[serde(default)]
    pub generic_wire_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Normalized aliases shorter than this only match whole words
    #[serde(default = "default_short_alias_threshold")]
    pub short_alias_threshold: usize,

    /// Credits above this that would be TRUE_REVENUE become OUTLIER
    #[serde(default)]
    pub outlier_threshold: Option<Decimal>,
}

fn default_short_alias_threshold() -> usize {
    6
}

impl Default for MatchSettings {
    fn default() -> Self {
        MatchSettings {
            short_alias_threshold: default_short_alias_threshold(),
            outlier_threshold: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenuePatternConfig {
    pub true_revenue_patterns: Vec<String>,
    pub non_true_revenue_patterns: Vec<String>,

    #[serde(alias = "zelle_venmo_patterns")]
    pub p2p_patterns: Vec<String>,

    pub treasury: TreasuryRules,
    pub wire: WireRules,

    #[serde(default)]
    pub settings: MatchSettings,
}

// ============================================================================
// CLASSIFIER CONFIG
// ============================================================================

/// Everything the Pattern Registry compiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub lenders: Vec<LenderEntry>,
    pub patterns: RevenuePatternConfig,
}

impl ClassifierConfig {
    pub fn new(lenders: Vec<LenderEntry>, patterns: RevenuePatternConfig) -> Self {
        ClassifierConfig { lenders, patterns }
    }

    /// Data set shipped with the crate
    pub fn builtin() -> std::result::Result<Self, ConfigError> {
        Self::from_json(BUILTIN_LENDERS, BUILTIN_PATTERNS)
    }

    /// Parse the two config documents
    pub fn from_json(lenders_json: &str, patterns_json: &str) -> std::result::Result<Self, ConfigError> {
        let lender_list: LenderList = serde_json::from_str(lenders_json)?;
        let patterns: RevenuePatternConfig = serde_json::from_str(patterns_json)?;

        Ok(ClassifierConfig::new(lender_list.lenders, patterns))
    }

    /// Load `mca_lender_list.json` and `revenue_patterns.json` from a data directory
    pub fn from_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let dir = data_dir.as_ref();
        Self::from_files(dir.join(LENDER_FILE), dir.join(PATTERN_FILE))
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(lender_path: P, pattern_path: Q) -> Result<Self> {
        let lenders_json = fs::read_to_string(lender_path.as_ref())
            .with_context(|| format!("Failed to read lender file: {:?}", lender_path.as_ref()))?;

        let patterns_json = fs::read_to_string(pattern_path.as_ref())
            .with_context(|| format!("Failed to read pattern file: {:?}", pattern_path.as_ref()))?;

        let lender_list: LenderList = serde_json::from_str(&lenders_json)
            .with_context(|| format!("Failed to parse lender JSON: {:?}", lender_path.as_ref()))?;

        let patterns: RevenuePatternConfig = serde_json::from_str(&patterns_json)
            .with_context(|| format!("Failed to parse pattern JSON: {:?}", pattern_path.as_ref()))?;

        Ok(ClassifierConfig::new(lender_list.lenders, patterns))
    }

    pub fn alias_count(&self) -> usize {
        self.lenders.iter().map(|l| l.aliases.len()).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
