// 🧭 Classification Orchestrator
//
// Runs every stage, per transaction, in fixed precedence:
//   0. description guard   empty / unreadable text → NEEDS_REVIEW + unclassifiable_description
//   1. lender              alias hit → MCA_PAYMENT (lender payments must not reach revenue logic)
//   2. p2p                 flag only
//   3. wire                wire_type; FOREIGN_REMITTANCE overrides to NON_TRUE_REVENUE
//   4. treasury            may override to NON_TRUE_REVENUE / NEEDS_REVIEW
//   5. revenue             baseline, only if nothing above decided
//   6. sign check          flag only, never changes revenue_type
//
// Stateless: the only shared state is the read-only RegistrySnapshot.

use crate::config::ClassifierConfig;
use crate::entities::normalize_description;
use crate::error::ConfigError;
use crate::registry::RegistrySnapshot;
use crate::rules::{ClassificationStage, RevenueEvaluator, Verdict};
use crate::transaction::{ClassifiedTransaction, Flag, RevenueType, Transaction};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// PIPELINE-ONLY STAGES
// ============================================================================

/// Step 0
struct DescriptionGuard;

impl ClassificationStage for DescriptionGuard {
    fn name(&self) -> &'static str {
        "description"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        if normalize_description(&tx.description).is_empty() {
            verdict.set_revenue(RevenueType::NeedsReview, "description is empty or unreadable");
            verdict.flag(Flag::UnclassifiableDescription);
        }
    }
}

/// Step 6
struct SignConsistencyCheck<'a> {
    revenue: &'a RevenueEvaluator,
}

impl ClassificationStage for SignConsistencyCheck<'_> {
    fn name(&self) -> &'static str {
        "sign_check"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        let revenue_on_debit = tx.is_debit() && self.revenue.has_true_revenue_signal(&tx.description);
        let mca_on_credit = verdict.revenue_type() == Some(RevenueType::McaPayment) && tx.amount > Decimal::ZERO;

        if revenue_on_debit || mca_on_credit {
            verdict.flag(Flag::AmountSignMismatch);
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Cheap to clone; clones share one compiled registry
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: Arc<RegistrySnapshot>,
}

impl Classifier {
    pub fn new(registry: Arc<RegistrySnapshot>) -> Self {
        Classifier { registry }
    }

    /// Compile a config and wrap it
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        Ok(Classifier::new(Arc::new(RegistrySnapshot::load(config)?)))
    }

    /// Classifier over the built-in data set
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Classifier::new(Arc::new(RegistrySnapshot::builtin()?)))
    }

    pub fn registry(&self) -> &Arc<RegistrySnapshot> {
        &self.registry
    }

    /// Classify one transaction. Always succeeds.
    pub fn classify(&self, tx: &Transaction) -> ClassifiedTransaction {
        let registry = self.registry.as_ref();
        let sign_check = SignConsistencyCheck {
            revenue: &registry.revenue,
        };

        let pipeline: [&dyn ClassificationStage; 7] = [
            &DescriptionGuard,
            &registry.lenders,
            &registry.p2p,
            &registry.wire,
            &registry.treasury,
            &registry.revenue,
            &sign_check,
        ];

        let mut verdict = Verdict::new();
        for stage in pipeline {
            stage.apply(tx, &mut verdict);
            trace!(stage = stage.name(), revenue_type = ?verdict.revenue_type(), "stage applied");
        }

        let classified = verdict.into_classified(tx.clone());
        debug!(
            date = %classified.date(),
            raw_type = tx.raw_type.as_str(),
            revenue_type = classified.revenue_type().as_str(),
            wire_type = classified.wire_type().map(|w| w.as_str()),
            lender = classified.mca_match(),
            flags = classified.flags().len(),
            "transaction classified"
        );
        classified
    }

    /// One output per input, same order
    pub fn classify_all(&self, transactions: &[Transaction]) -> Vec<ClassifiedTransaction> {
        transactions.iter().map(|tx| self.classify(tx)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LenderEntry;
    use crate::transaction::{TransactionType, WireType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::thread;

    fn classifier() -> Classifier {
        Classifier::builtin().unwrap()
    }

    fn tx(description: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            description,
            amount,
            TransactionType::Ach,
        )
    }

    fn wire(description: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            description,
            amount,
            TransactionType::Wire,
        )
    }

    fn sample_batch() -> Vec<Transaction> {
        vec![
            tx("SQUARE INC DEPOSIT 070124", dec!(1530.22)),
            tx("ONDECK CAPITAL ACH DEBIT", dec!(-412.50)),
            tx("ZELLE PAYMENT FROM JANE", dec!(200.00)),
            tx("IRS TREAS 310 TAX REF", dec!(4120.00)),
            tx("TREASURY DEPT MISC", dec!(75.00)),
            wire("ORIG: JOHN DOE WIRE", dec!(9000.00)),
            wire("B/O: INTERNAL XFER 1234", dec!(5000.00)),
            wire("FOREIGN BANK LONDON SWIFT XYZ", dec!(12000.00)),
            tx("STRIPE PAYOUT", dec!(-88.00)),
            tx("", dec!(10.00)),
            tx("MISC CREDIT 1182", dec!(61.00)),
        ]
    }

    #[test]
    fn test_longest_alias_tie_break() {
        let mut config = ClassifierConfig::builtin().unwrap();
        config.lenders = vec![
            LenderEntry::new("OnDeck Generic", &["ONDECK"]),
            LenderEntry::new("OnDeck Capital", &["ONDECK CAPITAL"]),
        ];
        let c = Classifier::from_config(&config).unwrap();

        let result = c.classify(&tx("ONDECK CAPITAL ADVANCE", dec!(-300.00)));
        assert_eq!(result.revenue_type(), RevenueType::McaPayment);
        assert_eq!(result.mca_match(), Some("OnDeck Capital"));
        assert_eq!(result.matched_alias(), Some("ONDECK CAPITAL"));
    }

    #[test]
    fn test_mca_payment() {
        let result = classifier().classify(&tx("ACH DEBIT KABBAGE INC 0042", dec!(-129.99)));

        assert_eq!(result.revenue_type(), RevenueType::McaPayment);
        assert_eq!(result.mca_match(), Some("Kabbage"));
        assert!(result.flags().is_empty());
    }

    #[test]
    fn test_mca_funding_credit_flagged() {
        let result = classifier().classify(&tx("FORWARD FINANCING FUNDING", dec!(25000.00)));

        assert_eq!(result.revenue_type(), RevenueType::McaPayment);
        assert!(result.has_flag(Flag::AmountSignMismatch));
    }

    #[test]
    fn test_orig_is_fed_wire() {
        let result = classifier().classify(&wire("ORIG: JOHN DOE WIRE", dec!(9000.00)));
        assert_eq!(result.wire_type(), Some(WireType::FedWire));
    }

    #[test]
    fn test_bo_internal_is_book_transfer() {
        let result = classifier().classify(&wire("B/O: INTERNAL XFER 1234", dec!(5000.00)));
        assert_eq!(result.wire_type(), Some(WireType::BookTransfer));
    }

    #[test]
    fn test_bo_external_is_chips() {
        let result = classifier().classify(&wire("B/O: ACME HOLDINGS LLC", dec!(5000.00)));
        assert_eq!(result.wire_type(), Some(WireType::ChipsCredit));
    }

    #[test]
    fn test_non_wire_has_no_wire_type() {
        let result = classifier().classify(&tx("SQUARE INC DEPOSIT", dec!(100.00)));
        assert_eq!(result.wire_type(), None);
    }

    #[test]
    fn test_upstream_wire_without_signature() {
        let result = classifier().classify(&wire("INCOMING 000981 ACME CO", dec!(700.00)));

        assert_eq!(result.wire_type(), Some(WireType::Unknown));
        assert!(result.has_flag(Flag::UnrecognizedWire));
    }

    #[test]
    fn test_p2p_flag_regardless_of_sign() {
        let c = classifier();

        for amount in [dec!(200.00), dec!(-200.00)] {
            let result = c.classify(&tx("ZELLE PAYMENT FROM JANE", amount));
            assert!(result.flags().contains_str("p2p_review"));
            assert_ne!(result.revenue_type(), RevenueType::TrueRevenue);
        }
    }

    #[test]
    fn test_p2p_does_not_change_revenue_type() {
        let result = classifier().classify(&tx("ZELLE FROM ACME CUSTOMER PAYMENT", dec!(640.00)));

        assert!(result.has_flag(Flag::P2pReview));
        assert_eq!(result.revenue_type(), RevenueType::TrueRevenue);
    }

    #[test]
    fn test_treasury_validated() {
        let result = classifier().classify(&tx("IRS TREAS 310 TAX REF", dec!(4120.00)));

        assert_eq!(result.revenue_type(), RevenueType::NonTrueRevenue);
        assert!(result.flags().contains_str("treasury_validated"));
    }

    #[test]
    fn test_treasury_unverified() {
        let result = classifier().classify(&tx("TREASURY DEPT MISC", dec!(75.00)));

        assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
        assert!(result.flags().contains_str("treasury_unverified"));
    }

    #[test]
    fn test_treasury_disqualifier_outranks_program_keyword() {
        let result = classifier().classify(&tx("IRS TREASURY MANAGEMENT FEE REBATE", dec!(310.00)));

        assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
        assert!(result.has_flag(Flag::TreasuryUnverified));
        assert!(!result.has_flag(Flag::TreasuryValidated));
    }

    #[test]
    fn test_tax_payment_debit_is_not_treasury_deposit() {
        let result = classifier().classify(&tx("IRS USATAXPYMT 270455", dec!(-8200.00)));

        assert!(!result.has_flag(Flag::TreasuryValidated));
        assert!(!result.has_flag(Flag::TreasuryUnverified));
        assert_ne!(result.revenue_type(), RevenueType::TrueRevenue);
    }

    #[test]
    fn test_unrelated_capital_firm_is_not_mca() {
        let result = classifier().classify(&tx("AMERICAN CAPITAL PARTNERS INVOICE 112", dec!(5000.00)));

        assert_ne!(result.revenue_type(), RevenueType::McaPayment);
        assert_eq!(result.mca_match(), None);
    }

    #[test]
    fn test_dotted_lender_name_matches() {
        let result = classifier().classify(&tx("ACH DEBIT I.O.U. FINANCIAL 0091", dec!(-450.00)));

        assert_eq!(result.revenue_type(), RevenueType::McaPayment);
        assert_eq!(result.mca_match(), Some("IOU Financial"));
    }

    #[test]
    fn test_raw_text_passes_through() {
        let raw = "06/01  ONDECK CAPITAL ACH DEBIT   PPD ID: 9988776655   -412.50";
        let input = tx("ONDECK CAPITAL ACH DEBIT", dec!(-412.50)).with_raw_text(raw);

        let result = classifier().classify(&input);
        assert_eq!(result.transaction(), &input);
        assert_eq!(result.transaction().raw_text, raw);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["raw_text"], raw);
    }

    #[test]
    fn test_foreign_wire_overrides_true_revenue_pattern() {
        let c = classifier();
        let description = "FOREIGN BANK LONDON SWIFT XYZ INVOICE 7781";
        assert!(c.registry().revenue_evaluator().has_true_revenue_signal(description));

        let result = c.classify(&wire(description, dec!(12000.00)));

        assert_eq!(result.wire_type(), Some(WireType::ForeignRemittance));
        assert_eq!(result.revenue_type(), RevenueType::NonTrueRevenue);
        assert!(result.has_flag(Flag::ForeignRemittance));
    }

    #[test]
    fn test_foreign_wire_plain() {
        let result = classifier().classify(&wire("FOREIGN BANK LONDON SWIFT XYZ", dec!(12000.00)));

        assert_eq!(result.wire_type(), Some(WireType::ForeignRemittance));
        assert_eq!(result.revenue_type(), RevenueType::NonTrueRevenue);
    }

    #[test]
    fn test_debit_with_revenue_pattern() {
        let result = classifier().classify(&tx("STRIPE PAYOUT", dec!(-88.00)));

        assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
        assert!(result.has_flag(Flag::AmountSignMismatch));
    }

    #[test]
    fn test_debit_mca_with_revenue_wording_keeps_mca() {
        let result = classifier().classify(&tx("SQUARE CAPITAL SQUARE INC LOAN PMT", dec!(-300.00)));

        assert_eq!(result.revenue_type(), RevenueType::McaPayment);
        assert_eq!(result.mca_match(), Some("Square Capital"));
        assert!(result.has_flag(Flag::AmountSignMismatch));
    }

    #[test]
    fn test_unclassifiable_description() {
        let c = classifier();

        for description in ["", "   ", "*** ---"] {
            let result = c.classify(&tx(description, dec!(10.00)));
            assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
            assert!(result.flags().contains_str("unclassifiable_description"));
        }

        let result = c.classify(&wire("", dec!(10.00)));
        assert_eq!(result.wire_type(), Some(WireType::Unknown));
        assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
    }

    #[test]
    fn test_no_signal_needs_review() {
        let result = classifier().classify(&tx("MISC CREDIT 1182", dec!(61.00)));

        assert_eq!(result.revenue_type(), RevenueType::NeedsReview);
        assert!(result.has_flag(Flag::NoRevenueSignal));
    }

    #[test]
    fn test_outlier_threshold() {
        let mut config = ClassifierConfig::builtin().unwrap();
        config.patterns.settings.outlier_threshold = Some(dec!(50000));
        let c = Classifier::from_config(&config).unwrap();

        let result = c.classify(&tx("STRIPE TRANSFER ST-8812", dec!(82000.00)));
        assert_eq!(result.revenue_type(), RevenueType::Outlier);
        assert!(result.has_flag(Flag::AmountOutlier));

        let result = c.classify(&tx("STRIPE TRANSFER ST-8813", dec!(8200.00)));
        assert_eq!(result.revenue_type(), RevenueType::TrueRevenue);
    }

    #[test]
    fn test_exactly_one_revenue_type_and_no_debit_revenue() {
        let c = classifier();
        let batch = sample_batch();
        let results = c.classify_all(&batch);

        assert_eq!(results.len(), batch.len());
        for (input, output) in batch.iter().zip(&results) {
            assert_eq!(output.transaction(), input);
            assert!(RevenueType::ALL.contains(&output.revenue_type()));
            if input.is_debit() {
                assert_ne!(output.revenue_type(), RevenueType::TrueRevenue);
            }
        }
    }

    #[test]
    fn test_flags_are_deduplicated() {
        let c = classifier();
        for result in c.classify_all(&sample_batch()) {
            let strs = result.flags().as_strs();
            let unique: HashSet<&str> = strs.iter().copied().collect();
            assert_eq!(unique.len(), strs.len());
        }
    }

    #[test]
    fn test_deterministic() {
        let c = classifier();
        let other = classifier();

        for t in sample_batch() {
            let a = c.classify(&t);
            let b = c.classify(&t);
            let fresh = other.classify(&t);

            assert_eq!(a, b);
            assert_eq!(a, fresh);
            assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        }
    }

    #[test]
    fn test_concurrent_classification_matches_sequential() {
        let c = classifier();
        let batch = sample_batch();
        let sequential = c.classify_all(&batch);

        let handles: Vec<_> = batch
            .iter()
            .cloned()
            .map(|t| {
                let c = c.clone();
                thread::spawn(move || c.classify(&t))
            })
            .collect();
        let parallel: Vec<ClassifiedTransaction> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_serialized_output_shape() {
        let result = classifier().classify(&tx("ONDECK CAPITAL ACH DEBIT", dec!(-412.50)));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["revenue_type"], "mca_payment");
        assert_eq!(json["mca_match"], "OnDeck");
        assert_eq!(json["description"], "ONDECK CAPITAL ACH DEBIT");
        assert_eq!(json["amount"], "-412.50");
        assert!(json.get("wire_type").is_none());
    }
}
