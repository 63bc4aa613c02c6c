// 💳 Transaction Model - input records and classification labels
// Input comes from the statement parser; output is created once by the Classifier.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION TYPE (upstream metadata)
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    /// Parser recognized the line as a wire
    Wire,
    #[default]
    Ach,
    Check,
    Card,
    Fee,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::Wire => "wire",
            TransactionType::Ach => "ach",
            TransactionType::Check => "check",
            TransactionType::Card => "card",
            TransactionType::Fee => "fee",
        }
    }
}

// ============================================================================
// TRANSACTION (read-only input)
// ============================================================================

/// Normalized bank statement line
///
/// Core fields are never modified by classification. `amount` is signed:
/// negative = debit, positive = credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,

    #[serde(default)]
    pub raw_type: TransactionType,

    /// Original statement text, passed through untouched
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_text: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: &str, amount: Decimal, raw_type: TransactionType) -> Self {
        Transaction {
            date,
            description: description.to_string(),
            amount,
            raw_type,
            raw_text: String::new(),
        }
    }

    pub fn with_raw_text(mut self, raw_text: &str) -> Self {
        self.raw_text = raw_text.to_string();
        self
    }

    /// Money leaving the account
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Money entering the account (zero counts as a credit)
    pub fn is_credit(&self) -> bool {
        !self.is_debit()
    }

    /// Upstream metadata marks this line as a wire
    pub fn is_flagged_wire(&self) -> bool {
        self.raw_type == TransactionType::Wire
    }
}

// ============================================================================
// CLASSIFICATION LABELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueType {
    TrueRevenue,
    NonTrueRevenue,
    Outlier,
    McaPayment,
    NeedsReview,
}

impl RevenueType {
    pub const ALL: [RevenueType; 5] = [
        RevenueType::TrueRevenue,
        RevenueType::NonTrueRevenue,
        RevenueType::Outlier,
        RevenueType::McaPayment,
        RevenueType::NeedsReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueType::TrueRevenue => "true_revenue",
            RevenueType::NonTrueRevenue => "non_true_revenue",
            RevenueType::Outlier => "outlier",
            RevenueType::McaPayment => "mca_payment",
            RevenueType::NeedsReview => "needs_review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    /// Generic wire signature with no more specific prefix
    WireTransfer,
    /// `ORIG:` prefix
    FedWire,
    /// `B/O:` prefix
    ChipsCredit,
    /// `B/O:` prefix naming an internal book transfer
    BookTransfer,
    ForeignRemittance,
    /// Upstream says wire, description carries no recognizable signature
    Unknown,
}

impl WireType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireType::WireTransfer => "wire_transfer",
            WireType::FedWire => "fed_wire",
            WireType::ChipsCredit => "chips_credit",
            WireType::BookTransfer => "book_transfer",
            WireType::ForeignRemittance => "foreign_remittance",
            WireType::Unknown => "unknown",
        }
    }
}

// ============================================================================
// FLAGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// Consumer P2P rail (Zelle, Venmo, Cash App, personal PayPal)
    P2pReview,
    ForeignRemittance,
    TreasuryValidated,
    TreasuryUnverified,
    /// Amount sign contradicts the pattern evidence
    AmountSignMismatch,
    UnclassifiableDescription,
    /// No revenue pattern matched
    NoRevenueSignal,
    AmountOutlier,
    UnrecognizedWire,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::P2pReview => "p2p_review",
            Flag::ForeignRemittance => "foreign_remittance",
            Flag::TreasuryValidated => "treasury_validated",
            Flag::TreasuryUnverified => "treasury_unverified",
            Flag::AmountSignMismatch => "amount_sign_mismatch",
            Flag::UnclassifiableDescription => "unclassifiable_description",
            Flag::NoRevenueSignal => "no_revenue_signal",
            Flag::AmountOutlier => "amount_outlier",
            Flag::UnrecognizedWire => "unrecognized_wire",
        }
    }
}

/// Ordered set of flags: insertion order kept, duplicates dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(Vec<Flag>);

impl Flags {
    pub fn new() -> Self {
        Flags(Vec::new())
    }

    /// Returns false if the flag was already present
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.0.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn contains_str(&self, tag: &str) -> bool {
        self.0.iter().any(|f| f.as_str() == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_strs(&self) -> Vec<&'static str> {
        self.0.iter().map(|f| f.as_str()).collect()
    }
}

// ============================================================================
// CLASSIFIED TRANSACTION (output)
// ============================================================================

/// Transaction plus its verdict. Built once by the Classifier; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    transaction: Transaction,

    revenue_type: RevenueType,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    mca_match: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_alias: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    wire_type: Option<WireType>,

    #[serde(default)]
    flags: Flags,

    /// Which rule decided `revenue_type`
    reason: String,
}

impl ClassifiedTransaction {
    pub(crate) fn new(
        transaction: Transaction,
        revenue_type: RevenueType,
        mca_match: Option<(String, String)>,
        wire_type: Option<WireType>,
        flags: Flags,
        reason: String,
    ) -> Self {
        let (mca_match, matched_alias) = match mca_match {
            Some((lender, alias)) => (Some(lender), Some(alias)),
            None => (None, None),
        };

        ClassifiedTransaction {
            transaction,
            revenue_type,
            mca_match,
            matched_alias,
            wire_type,
            flags,
            reason,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn description(&self) -> &str {
        &self.transaction.description
    }

    pub fn amount(&self) -> Decimal {
        self.transaction.amount
    }

    pub fn revenue_type(&self) -> RevenueType {
        self.revenue_type
    }

    /// Canonical lender name
    pub fn mca_match(&self) -> Option<&str> {
        self.mca_match.as_deref()
    }

    /// Alias that produced `mca_match`
    pub fn matched_alias(&self) -> Option<&str> {
        self.matched_alias.as_deref()
    }

    pub fn wire_type(&self) -> Option<WireType> {
        self.wire_type
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Needs a human: NEEDS_REVIEW or any flag
    pub fn needs_attention(&self) -> bool {
        self.revenue_type == RevenueType::NeedsReview || !self.flags.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
