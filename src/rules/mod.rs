// 🏷️ Classification Rules - one module per rule family
//
// Each family compiles from config into an immutable evaluator and plugs into the
// Classifier as a ClassificationStage. Stages run in a fixed order over a shared
// Verdict; a later stage may override an earlier revenue_type, never the reverse.

pub mod lender;
pub mod p2p;
pub mod revenue;
pub mod treasury;
pub mod wire;

pub use lender::{LenderMatch, LenderMatcher};
pub use p2p::P2pDetector;
pub use revenue::{RevenueEvaluation, RevenueEvaluator};
pub use treasury::{TreasuryStatus, TreasuryValidation, TreasuryValidator};
pub use wire::WireClassifier;

use crate::transaction::{ClassifiedTransaction, Flag, Flags, RevenueType, Transaction, WireType};

// ============================================================================
// STAGE TRAIT
// ============================================================================

/// One step of the classification pipeline
pub trait ClassificationStage {
    fn name(&self) -> &'static str;

    /// Inspect the transaction and update the accumulating verdict
    fn apply(&self, tx: &Transaction, verdict: &mut Verdict);
}

// ============================================================================
// VERDICT (partial result)
// ============================================================================

/// Accumulates stage decisions for one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    revenue_type: Option<RevenueType>,
    reason: Option<String>,
    mca_match: Option<LenderMatch>,
    wire_type: Option<WireType>,
    flags: Flags,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revenue_type(&self) -> Option<RevenueType> {
        self.revenue_type
    }

    /// Some stage has already assigned a revenue_type
    pub fn is_decided(&self) -> bool {
        self.revenue_type.is_some()
    }

    /// Assign (or override) the revenue_type
    pub fn set_revenue(&mut self, revenue_type: RevenueType, reason: impl Into<String>) {
        self.revenue_type = Some(revenue_type);
        self.reason = Some(reason.into());
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn set_mca_match(&mut self, lender_match: LenderMatch) {
        self.mca_match = Some(lender_match);
    }

    pub fn mca_match(&self) -> Option<&LenderMatch> {
        self.mca_match.as_ref()
    }

    pub fn set_wire_type(&mut self, wire_type: WireType) {
        self.wire_type = Some(wire_type);
    }

    pub fn wire_type(&self) -> Option<WireType> {
        self.wire_type
    }

    pub fn flag(&mut self, flag: Flag) {
        self.flags.insert(flag);
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Freeze into the output record
    pub(crate) fn into_classified(self, tx: Transaction) -> ClassifiedTransaction {
        let (revenue_type, reason) = match self.revenue_type {
            Some(rt) => (rt, self.reason.unwrap_or_default()),
            None => (RevenueType::NeedsReview, "no stage assigned a revenue type".to_string()),
        };

        ClassifiedTransaction::new(
            tx,
            revenue_type,
            self.mca_match.map(|m| (m.lender, m.alias)),
            self.wire_type,
            self.flags,
            reason,
        )
    }
}
