// 🌐 Wire Classifier - prefix dispatch on wire descriptions
//
// Order:
// 1. "ORIG:" prefix                → FED_WIRE
// 2. "B/O:" prefix                 → CHIPS_CREDIT, or BOOK_TRANSFER when the remainder is internal
// 3. foreign bank / SWIFT / country → FOREIGN_REMITTANCE (forces NON_TRUE_REVENUE)
// 4. plain wire wording            → WIRE_TRANSFER
// 5. upstream says wire            → UNKNOWN
// Non-wire transactions get no wire_type at all.

use super::{ClassificationStage, Verdict};
use crate::config::WireRules;
use crate::error::ConfigError;
use crate::registry::PatternSet;
use crate::transaction::{Flag, RevenueType, Transaction, WireType};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct WireClassifier {
    /// Uppercased literal prefixes
    fed_wire_prefixes: Vec<String>,
    chips_prefixes: Vec<String>,
    book_transfer: PatternSet,
    foreign: PatternSet,
    generic: PatternSet,
}

impl WireClassifier {
    pub fn compile(rules: &WireRules) -> Result<Self, ConfigError> {
        Ok(WireClassifier {
            fed_wire_prefixes: compile_prefixes("fed_wire_prefixes", &rules.fed_wire_prefixes)?,
            chips_prefixes: compile_prefixes("chips_prefixes", &rules.chips_prefixes)?,
            book_transfer: PatternSet::compile("book_transfer_patterns", &rules.book_transfer_patterns)?,
            foreign: PatternSet::compile("foreign_patterns", &rules.foreign_patterns)?,
            generic: PatternSet::compile("generic_wire_patterns", &rules.generic_wire_patterns)?,
        })
    }

    /// Wire type from the description alone
    pub fn classify(&self, description: &str) -> Option<WireType> {
        let upper = description.trim_start().to_uppercase();

        if self.fed_wire_prefixes.iter().any(|p| upper.starts_with(p.as_str())) {
            return Some(WireType::FedWire);
        }

        if let Some(prefix) = self.chips_prefixes.iter().find(|p| upper.starts_with(p.as_str())) {
            let remainder = &upper[prefix.len()..];
            if self.book_transfer.is_match(remainder) {
                return Some(WireType::BookTransfer);
            }
            return Some(WireType::ChipsCredit);
        }

        if self.foreign.is_match(description) {
            return Some(WireType::ForeignRemittance);
        }

        if self.generic.is_match(description) {
            return Some(WireType::WireTransfer);
        }

        None
    }

    /// Description first, then upstream wire metadata
    pub fn classify_transaction(&self, tx: &Transaction) -> Option<WireType> {
        self.classify(&tx.description)
            .or_else(|| tx.is_flagged_wire().then_some(WireType::Unknown))
    }

    pub fn pattern_sets(&self) -> Vec<&PatternSet> {
        vec![&self.book_transfer, &self.foreign, &self.generic]
    }
}

fn compile_prefixes(rule: &str, prefixes: &[String]) -> Result<Vec<String>, ConfigError> {
    prefixes
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let p = p.trim_start();
            if p.trim().is_empty() {
                Err(ConfigError::EmptyPrefix {
                    rule: rule.to_string(),
                    index,
                })
            } else {
                Ok(p.to_uppercase())
            }
        })
        .collect()
}

/// Step 3: sets wire_type; FOREIGN_REMITTANCE overrides any earlier revenue_type
impl ClassificationStage for WireClassifier {
    fn name(&self) -> &'static str {
        "wire"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        let Some(wire_type) = self.classify_transaction(tx) else {
            return;
        };

        trace!(wire_type = wire_type.as_str(), "wire classified");
        verdict.set_wire_type(wire_type);

        match wire_type {
            WireType::ForeignRemittance => {
                verdict.set_revenue(RevenueType::NonTrueRevenue, "foreign remittance wire");
                verdict.flag(Flag::ForeignRemittance);
            }
            WireType::Unknown => verdict.flag(Flag::UnrecognizedWire),
            _ => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
