// 🔎 Lender Matcher - alias lookup over noisy statement text
//
// Algorithm:
// 1. Normalize description (uppercase, punctuation → space, collapse whitespace)
// 2. Scan every alias of every lender as a contiguous substring starting on a word
//    boundary; the tail stays open for truncated text ("ONDECK CAPITALPMT")
// 3. Longest alias wins ("ONDECK CAPITAL" beats "ONDECK"); ties go to the lender registered first
// 4. No hit → retry on the punctuation-stripped form ("I.O.U. FINANCIAL" → "IOU FINANCIAL")
//
// Aliases shorter than `short_alias_threshold` must sit on word boundaries at both
// ends, otherwise "IOU" would hit "IOUCENTRAL". The leading boundary keeps
// "CAN CAPITAL" out of "AMERICAN CAPITAL".

use super::{ClassificationStage, Verdict};
use crate::config::{LenderEntry, MatchSettings};
use crate::entities::{normalize_description, strip_punctuation, LenderAliasTable};
use crate::error::ConfigError;
use crate::transaction::{RevenueType, Transaction};
use std::cmp::Reverse;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenderMatch {
    /// Canonical lender name
    pub lender: String,

    /// Normalized alias that hit
    pub alias: String,
}

#[derive(Debug, Clone)]
struct AliasCandidate {
    alias: String,
    /// Alias with a leading space, plus a trailing one when it must match whole words
    needle: String,
    lender_index: usize,
}

#[derive(Debug, Clone)]
pub struct LenderMatcher {
    table: LenderAliasTable,
    /// Sorted by tie-break priority: first hit is the answer
    candidates: Vec<AliasCandidate>,
}

impl LenderMatcher {
    pub fn compile(entries: &[LenderEntry], settings: &MatchSettings) -> Result<Self, ConfigError> {
        let table = LenderAliasTable::from_entries(entries)?;

        let mut candidates: Vec<AliasCandidate> = Vec::with_capacity(table.alias_count());
        for (lender_index, lender) in table.lenders().iter().enumerate() {
            for alias in &lender.aliases {
                let needle = if alias.chars().count() < settings.short_alias_threshold {
                    format!(" {} ", alias)
                } else {
                    format!(" {}", alias)
                };

                candidates.push(AliasCandidate {
                    alias: alias.clone(),
                    needle,
                    lender_index,
                });
            }
        }

        // Stable sort keeps declaration order among equal keys
        candidates.sort_by_key(|c| (Reverse(c.alias.chars().count()), c.lender_index));

        Ok(LenderMatcher { table, candidates })
    }

    pub fn table(&self) -> &LenderAliasTable {
        &self.table
    }

    /// Canonical lender for a raw description, if any alias matches
    pub fn match_description(&self, description: &str) -> Option<LenderMatch> {
        self.match_normalized(&normalize_description(description)).or_else(|| {
            let stripped = strip_punctuation(description);
            self.match_normalized(&stripped)
        })
    }

    /// Same as `match_description` for text already passed through `normalize_description`
    pub fn match_normalized(&self, normalized: &str) -> Option<LenderMatch> {
        if normalized.is_empty() {
            return None;
        }

        let padded = format!(" {} ", normalized);

        self.candidates
            .iter()
            .find(|c| padded.contains(&c.needle))
            .map(|c| LenderMatch {
                lender: self.table.lenders()[c.lender_index].canonical_name.clone(),
                alias: c.alias.clone(),
            })
    }
}

/// Step 1: a lender hit makes the transaction an MCA payment
impl ClassificationStage for LenderMatcher {
    fn name(&self) -> &'static str {
        "lender"
    }

    fn apply(&self, tx: &Transaction, verdict: &mut Verdict) {
        if let Some(hit) = self.match_description(&tx.description) {
            trace!(lender = %hit.lender, alias = %hit.alias, "lender alias matched");
            verdict.set_revenue(
                RevenueType::McaPayment,
                format!("MCA lender alias '{}' ({})", hit.alias, hit.lender),
            );
            verdict.set_mca_match(hit);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
