// 🗂️ Pattern Registry - compiled, immutable rule data
// load(config) → RegistrySnapshot. Pure, idempotent, fails fast on the first bad entry.
// After load nothing mutates the snapshot; share it behind an Arc.

use crate::config::ClassifierConfig;
use crate::error::ConfigError;
use crate::rules::{LenderMatcher, P2pDetector, RevenueEvaluator, TreasuryValidator, WireClassifier};
use regex::{Regex, RegexBuilder};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

// ============================================================================
// COMPILED PATTERN
// ============================================================================

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern text as written in the config
    pub source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

// ============================================================================
// PATTERN SET
// ============================================================================

/// Named, ordered list of case-insensitive regexes
#[derive(Debug, Clone)]
pub struct PatternSet {
    name: String,
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every pattern or fail naming the offending entry
    pub fn compile(name: &str, sources: &[String]) -> Result<Self, ConfigError> {
        let mut patterns = Vec::with_capacity(sources.len());

        for (index, source) in sources.iter().enumerate() {
            if source.trim().is_empty() {
                return Err(ConfigError::EmptyPattern {
                    set: name.to_string(),
                    index,
                });
            }

            let regex = RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    set: name.to_string(),
                    index,
                    pattern: source.clone(),
                    source: e,
                })?;

            patterns.push(CompiledPattern {
                source: source.clone(),
                regex,
            });
        }

        Ok(PatternSet {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First pattern (in config order) that matches
    pub fn find(&self, text: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.is_match(text))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.source.as_str()).collect()
    }
}

// ============================================================================
// REGISTRY SNAPSHOT
// ============================================================================

/// Every rule family, compiled. Read-only after `load`.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub(crate) lenders: LenderMatcher,
    pub(crate) revenue: RevenueEvaluator,
    pub(crate) wire: WireClassifier,
    pub(crate) treasury: TreasuryValidator,
    pub(crate) p2p: P2pDetector,
    fingerprint: String,
}

impl RegistrySnapshot {
    /// Compile a config. Never partially loads: any bad entry aborts with a ConfigError.
    pub fn load(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        match Self::compile(config) {
            Ok(snapshot) => {
                info!(
                    lenders = snapshot.lenders.table().count(),
                    aliases = snapshot.lenders.table().alias_count(),
                    patterns = snapshot.pattern_count(),
                    fingerprint = %snapshot.fingerprint,
                    "pattern registry loaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "pattern registry rejected configuration");
                Err(e)
            }
        }
    }

    /// Built-in data set from `data/`
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::load(&ClassifierConfig::builtin()?)
    }

    fn compile(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let patterns = &config.patterns;

        let lenders = LenderMatcher::compile(&config.lenders, &patterns.settings)?;
        let revenue = RevenueEvaluator::compile(
            &patterns.true_revenue_patterns,
            &patterns.non_true_revenue_patterns,
            &patterns.settings,
        )?;
        let wire = WireClassifier::compile(&patterns.wire)?;
        let treasury = TreasuryValidator::compile(&patterns.treasury)?;
        let p2p = P2pDetector::compile(&patterns.p2p_patterns)?;

        Ok(RegistrySnapshot {
            lenders,
            revenue,
            wire,
            treasury,
            p2p,
            fingerprint: fingerprint(config)?,
        })
    }

    /// SHA-256 of the canonical config JSON; equal configs ⇒ equal fingerprints
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn lender_matcher(&self) -> &LenderMatcher {
        &self.lenders
    }

    pub fn revenue_evaluator(&self) -> &RevenueEvaluator {
        &self.revenue
    }

    pub fn wire_classifier(&self) -> &WireClassifier {
        &self.wire
    }

    pub fn treasury_validator(&self) -> &TreasuryValidator {
        &self.treasury
    }

    pub fn p2p_detector(&self) -> &P2pDetector {
        &self.p2p
    }

    /// All compiled pattern sets, in a fixed order
    pub fn pattern_sets(&self) -> Vec<&PatternSet> {
        let mut sets = Vec::new();
        sets.extend(self.revenue.pattern_sets());
        sets.extend(self.wire.pattern_sets());
        sets.extend(self.treasury.pattern_sets());
        sets.push(self.p2p.patterns());
        sets
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_sets().iter().map(|s| s.len()).sum()
    }
}

fn fingerprint(config: &ClassifierConfig) -> Result<String, ConfigError> {
    let canonical = serde_json::to_vec(config)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
