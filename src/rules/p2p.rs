// 📱 P2P Detector - consumer payment rails
// Zelle / Venmo / Cash App / personal PayPal: intent is ambiguous, so flag, don't classify.

use super::{ClassificationStage, Verdict};
use crate::error::ConfigError;
use crate::registry::{CompiledPattern, PatternSet};
use crate::transaction::{Flag, Transaction};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct P2pDetector {
    patterns: PatternSet,
}

impl P2pDetector {
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        Ok(P2pDetector {
            patterns: PatternSet::compile("p2p_patterns", patterns)?,
        })
    }

    /// Pattern of the rail that matched, if any
    pub fn detect(&self, description: &str) -> Option<&CompiledPattern> {
        self.patterns.find(description)
    }

    pub fn is_p2p(&self, description: &str) -> bool {
        self.detect(description).is_some()
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}

/// Step 2: flag only; revenue_type is left alone whatever it is
impl ClassificationStage for P2pDetector {
    fn name(&self) -> &'static str {
        "p2p"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        if let Some(rail) = self.detect(&tx.description) {
            trace!(pattern = %rail.source, "p2p rail detected");
            verdict.flag(Flag::P2pReview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RevenueType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn detector() -> P2pDetector {
        P2pDetector::compile(&[
            "\\bZELLE\\b".to_string(),
            "\\bVENMO\\b".to_string(),
            "\\bCASH\\s*APP\\b".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_detects_rails() {
        let d = detector();

        assert!(d.is_p2p("ZELLE PAYMENT FROM JANE"));
        assert!(d.is_p2p("venmo cashout"));
        assert!(d.is_p2p("CASHAPP*JOHN"));
        assert!(!d.is_p2p("SQUARE INC DEPOSIT"));
        assert!(!d.is_p2p("GAZELLE INDUSTRIES"));
    }

    #[test]
    fn test_flag_does_not_touch_revenue_type() {
        let d = detector();
        let tx = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "ZELLE PAYMENT FROM JANE",
            dec!(-40.00),
            Default::default(),
        );

        let mut verdict = Verdict::new();
        verdict.set_revenue(RevenueType::McaPayment, "prior stage");
        d.apply(&tx, &mut verdict);

        assert!(verdict.flags().contains(Flag::P2pReview));
        assert_eq!(verdict.revenue_type(), Some(RevenueType::McaPayment));
    }
}
