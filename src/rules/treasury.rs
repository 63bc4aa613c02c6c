// 🏛️ Treasury Validator - genuine tax-authority deposits vs. generic "treasury" wording
//
// Genuine (program keyword, no disqualifier) → NON_TRUE_REVENUE + treasury_validated
//   Tax refunds and credits are never operating revenue.
// Bare treasury wording or a disqualifier  → NEEDS_REVIEW + treasury_unverified
// Debits (tax payments) are never treasury deposits; later stages handle them.

use super::{ClassificationStage, Verdict};
use crate::config::TreasuryRules;
use crate::error::ConfigError;
use crate::registry::PatternSet;
use crate::transaction::{Flag, RevenueType, Transaction};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreasuryStatus {
    /// Program keyword present, nothing disqualifying
    Validated,
    /// Treasury wording we can't trust at face value
    Unverified,
    /// No treasury language, or money leaving the account
    NotTreasury,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasuryValidation {
    pub status: TreasuryStatus,
    pub reason: String,
}

impl TreasuryValidation {
    fn new(status: TreasuryStatus, reason: String) -> Self {
        TreasuryValidation { status, reason }
    }

    pub fn is_genuine(&self) -> bool {
        self.status == TreasuryStatus::Validated
    }
}

#[derive(Debug, Clone)]
pub struct TreasuryValidator {
    program_keywords: PatternSet,
    generic_terms: PatternSet,
    disqualifiers: PatternSet,
}

impl TreasuryValidator {
    pub fn compile(rules: &TreasuryRules) -> Result<Self, ConfigError> {
        Ok(TreasuryValidator {
            program_keywords: PatternSet::compile("treasury.program_keywords", &rules.program_keywords)?,
            generic_terms: PatternSet::compile("treasury.generic_terms", &rules.generic_terms)?,
            disqualifiers: PatternSet::compile("treasury.disqualifiers", &rules.disqualifiers)?,
        })
    }

    /// Any treasury language (program keyword or generic term)
    pub fn mentions_treasury(&self, description: &str) -> bool {
        self.program_keywords.is_match(description) || self.generic_terms.is_match(description)
    }

    pub fn validate(&self, tx: &Transaction) -> TreasuryValidation {
        if tx.is_debit() {
            return TreasuryValidation::new(TreasuryStatus::NotTreasury, "debit, not a deposit".to_string());
        }

        let description = tx.description.as_str();

        let program = self.program_keywords.find(description);
        if program.is_none() && !self.generic_terms.is_match(description) {
            return TreasuryValidation::new(TreasuryStatus::NotTreasury, "no treasury language".to_string());
        }

        if let Some(disqualifier) = self.disqualifiers.find(description) {
            return TreasuryValidation::new(
                TreasuryStatus::Unverified,
                format!("treasury wording disqualified by '{}'", disqualifier.source),
            );
        }

        match program {
            Some(keyword) => TreasuryValidation::new(
                TreasuryStatus::Validated,
                format!("treasury program keyword '{}'", keyword.source),
            ),
            None => TreasuryValidation::new(
                TreasuryStatus::Unverified,
                "generic treasury term without a program keyword".to_string(),
            ),
        }
    }

    pub fn pattern_sets(&self) -> Vec<&PatternSet> {
        vec![&self.program_keywords, &self.generic_terms, &self.disqualifiers]
    }
}

/// Step 4: may override to NON_TRUE_REVENUE or NEEDS_REVIEW
impl ClassificationStage for TreasuryValidator {
    fn name(&self) -> &'static str {
        "treasury"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        let validation = self.validate(tx);
        trace!(status = ?validation.status, reason = %validation.reason, "treasury check");

        match validation.status {
            TreasuryStatus::Validated => {
                verdict.set_revenue(RevenueType::NonTrueRevenue, validation.reason);
                verdict.flag(Flag::TreasuryValidated);
            }
            TreasuryStatus::Unverified => {
                verdict.set_revenue(RevenueType::NeedsReview, validation.reason);
                verdict.flag(Flag::TreasuryUnverified);
            }
            TreasuryStatus::NotTreasury => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
