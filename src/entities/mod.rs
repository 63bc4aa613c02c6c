// Entity Models
// Static reference data the rule evaluators match against.

pub mod lender;

pub use lender::{normalize_description, strip_punctuation, Lender, LenderAliasTable};
