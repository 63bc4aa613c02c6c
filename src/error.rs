// ⚠️ Configuration Errors
// Everything that can go wrong while compiling the static rule data.
// Classification itself has no error type: uncertainty becomes NEEDS_REVIEW + flags.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pattern #{index} in '{set}': {pattern:?}: {source}")]
    InvalidPattern {
        set: String,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("empty pattern #{index} in '{set}'")]
    EmptyPattern { set: String, index: usize },

    #[error("lender entry #{index} has an empty canonical name")]
    EmptyLenderName { index: usize },

    #[error("lender '{name}' is registered more than once")]
    DuplicateLender { name: String },

    #[error("lender '{lender}' has an alias that is empty after normalization: {alias:?}")]
    EmptyAlias { lender: String, alias: String },

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("empty prefix #{index} in wire rule '{rule}'")]
    EmptyPrefix { rule: String, index: usize },

    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_entry() {
        let err = ConfigError::DuplicateAlias {
            alias: "ONDECK".to_string(),
            first: "OnDeck".to_string(),
            second: "Other".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ONDECK"));
        assert!(msg.contains("OnDeck"));
        assert!(msg.contains("Other"));

        let err = ConfigError::EmptyPattern {
            set: "true_revenue_patterns".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "empty pattern #3 in 'true_revenue_patterns'");
    }
}
