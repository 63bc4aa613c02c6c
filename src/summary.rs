// 📊 Classification Summary - batch roll-up for downstream cash-flow analytics

use crate::transaction::{ClassifiedTransaction, RevenueType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub total_transactions: usize,

    /// Count per revenue type (every type present, zero if unused)
    pub by_revenue_type: BTreeMap<RevenueType, usize>,

    /// Sum of TRUE_REVENUE amounts
    pub true_revenue_total: Decimal,

    /// Sum of MCA payment debits, as a positive number
    pub mca_payment_total: Decimal,

    /// MCA payment count per canonical lender
    pub mca_lenders: BTreeMap<String, usize>,

    /// NEEDS_REVIEW or carrying any flag
    pub needs_attention_count: usize,

    pub wire_count: usize,
}

impl ClassificationSummary {
    pub fn from_classified(results: &[ClassifiedTransaction]) -> Self {
        let mut by_revenue_type: BTreeMap<RevenueType, usize> =
            RevenueType::ALL.iter().map(|rt| (*rt, 0)).collect();
        let mut mca_lenders: BTreeMap<String, usize> = BTreeMap::new();
        let mut true_revenue_total = Decimal::ZERO;
        let mut mca_payment_total = Decimal::ZERO;

        for result in results {
            *by_revenue_type.entry(result.revenue_type()).or_insert(0) += 1;

            match result.revenue_type() {
                RevenueType::TrueRevenue => true_revenue_total += result.amount(),
                RevenueType::McaPayment => {
                    if result.amount() < Decimal::ZERO {
                        mca_payment_total += result.amount().abs();
                    }
                    if let Some(lender) = result.mca_match() {
                        *mca_lenders.entry(lender.to_string()).or_insert(0) += 1;
                    }
                }
                _ => {}
            }
        }

        ClassificationSummary {
            total_transactions: results.len(),
            by_revenue_type,
            true_revenue_total,
            mca_payment_total,
            mca_lenders,
            needs_attention_count: results.iter().filter(|r| r.needs_attention()).count(),
            wire_count: results.iter().filter(|r| r.wire_type().is_some()).count(),
        }
    }

    pub fn count(&self, revenue_type: RevenueType) -> usize {
        self.by_revenue_type.get(&revenue_type).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} transactions: {} true revenue ({}), {} MCA payments ({}) across {} lenders | {} need attention, {} wires",
            self.total_transactions,
            self.count(RevenueType::TrueRevenue),
            self.true_revenue_total,
            self.count(RevenueType::McaPayment),
            self.mca_payment_total,
            self.mca_lenders.len(),
            self.needs_attention_count,
            self.wire_count
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
