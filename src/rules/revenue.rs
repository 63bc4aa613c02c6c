// 💵 Revenue Rule Evaluator - true vs. non-true revenue
//
// First match wins:
// 1. non-true revenue patterns (refund, chargeback, owner transfer, loan proceeds, tax refund)
// 2. true revenue patterns (processor / POS / customer payment)
// 3. nothing matched → NEEDS_REVIEW; silence is never revenue
//
// A debit never yields TRUE_REVENUE. A true-revenue pattern on a debit is a data
// inconsistency: the evaluator says NEEDS_REVIEW and the sign check flags it.

use super::{ClassificationStage, Verdict};
use crate::config::MatchSettings;
use crate::error::ConfigError;
use crate::registry::PatternSet;
use crate::transaction::{Flag, RevenueType, Transaction};
use rust_decimal::Decimal;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueEvaluation {
    pub revenue_type: RevenueType,
    pub reason: String,

    /// Source of the pattern that decided, if any
    pub matched_pattern: Option<String>,

    /// True-revenue pattern on a debit
    pub sign_mismatch: bool,

    /// Credit above the outlier threshold
    pub outlier: bool,
}

#[derive(Debug, Clone)]
pub struct RevenueEvaluator {
    true_revenue: PatternSet,
    non_true_revenue: PatternSet,
    outlier_threshold: Option<Decimal>,
}

impl RevenueEvaluator {
    pub fn compile(
        true_revenue: &[String],
        non_true_revenue: &[String],
        settings: &MatchSettings,
    ) -> Result<Self, ConfigError> {
        Ok(RevenueEvaluator {
            true_revenue: PatternSet::compile("true_revenue_patterns", true_revenue)?,
            non_true_revenue: PatternSet::compile("non_true_revenue_patterns", non_true_revenue)?,
            outlier_threshold: settings.outlier_threshold,
        })
    }

    pub fn evaluate(&self, tx: &Transaction) -> RevenueEvaluation {
        let description = tx.description.as_str();

        if let Some(p) = self.non_true_revenue.find(description) {
            return RevenueEvaluation {
                revenue_type: RevenueType::NonTrueRevenue,
                reason: format!("non-true revenue pattern '{}'", p.source),
                matched_pattern: Some(p.source.clone()),
                sign_mismatch: false,
                outlier: false,
            };
        }

        if let Some(p) = self.true_revenue.find(description) {
            if tx.is_debit() {
                return RevenueEvaluation {
                    revenue_type: RevenueType::NeedsReview,
                    reason: format!("true revenue pattern '{}' on a debit", p.source),
                    matched_pattern: Some(p.source.clone()),
                    sign_mismatch: true,
                    outlier: false,
                };
            }

            if let Some(threshold) = self.outlier_threshold {
                if tx.amount > threshold {
                    return RevenueEvaluation {
                        revenue_type: RevenueType::Outlier,
                        reason: format!("true revenue pattern '{}' above outlier threshold {}", p.source, threshold),
                        matched_pattern: Some(p.source.clone()),
                        sign_mismatch: false,
                        outlier: true,
                    };
                }
            }

            return RevenueEvaluation {
                revenue_type: RevenueType::TrueRevenue,
                reason: format!("true revenue pattern '{}'", p.source),
                matched_pattern: Some(p.source.clone()),
                sign_mismatch: false,
                outlier: false,
            };
        }

        RevenueEvaluation {
            revenue_type: RevenueType::NeedsReview,
            reason: "no revenue pattern matched".to_string(),
            matched_pattern: None,
            sign_mismatch: false,
            outlier: false,
        }
    }

    /// Description carries a true-revenue signal not cancelled by a non-true one
    pub fn has_true_revenue_signal(&self, description: &str) -> bool {
        !self.non_true_revenue.is_match(description) && self.true_revenue.is_match(description)
    }

    pub fn pattern_sets(&self) -> Vec<&PatternSet> {
        vec![&self.true_revenue, &self.non_true_revenue]
    }
}

/// Step 5: baseline, only when no earlier stage decided
impl ClassificationStage for RevenueEvaluator {
    fn name(&self) -> &'static str {
        "revenue"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        if verdict.is_decided() {
            return;
        }

        let evaluation = self.evaluate(tx);
        trace!(revenue_type = evaluation.revenue_type.as_str(), reason = %evaluation.reason, "revenue evaluated");

        if evaluation.outlier {
            verdict.flag(Flag::AmountOutlier);
        }
        if evaluation.matched_pattern.is_none() {
            verdict.flag(Flag::NoRevenueSignal);
        }
        verdict.set_revenue(evaluation.revenue_type, evaluation.reason);
    }
}

// ============================================================================
// TESTS
// ============================================================================
