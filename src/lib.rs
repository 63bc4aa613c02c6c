// MCA Revenue Classifier - Core Library
// Labels parsed bank transactions: revenue type, MCA lender, wire type, review flags.

pub mod config;
pub mod error;
pub mod transaction;
pub mod entities;       // Lender alias table
pub mod registry;       // Pattern Registry: compiled, immutable rule data
pub mod rules;          // Lender / P2P / Wire / Treasury / Revenue evaluators
pub mod classifier;     // Orchestrator
pub mod summary;

// Re-export commonly used types
pub use config::{
    ClassifierConfig, LenderEntry, LenderList, MatchSettings, RevenuePatternConfig,
    TreasuryRules, WireRules,
};
pub use error::ConfigError;
pub use transaction::{
    ClassifiedTransaction, Flag, Flags, RevenueType, Transaction, TransactionType, WireType,
};
pub use entities::{normalize_description, strip_punctuation, Lender, LenderAliasTable};
pub use registry::{CompiledPattern, PatternSet, RegistrySnapshot};
pub use rules::{
    ClassificationStage, LenderMatch, LenderMatcher, P2pDetector, RevenueEvaluation,
    RevenueEvaluator, TreasuryStatus, TreasuryValidation, TreasuryValidator, Verdict,
    WireClassifier,
};
pub use classifier::Classifier;
pub use summary::ClassificationSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
