// 🏦 Lender Entity - canonical MCA lender + known aliases
//
// Problem solved:
// - "ONDECK CAPITAL", "ON DECK CAPITAL", "ODK CAPITAL" → All same lender
// - Processor boilerplate and punctuation ("ACH DEBIT ONDECK-CAPITAL*PMT") normalized away
// - Aliases are unique across lenders; a collision is a configuration error

use crate::config::LenderEntry;
use crate::error::ConfigError;
use std::collections::HashMap;

// ============================================================================
// LENDER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lender {
    /// Canonical name (the one reported downstream)
    pub canonical_name: String,

    /// Normalized aliases, in declaration order
    pub aliases: Vec<String>,

    /// Registration position; lower wins alias-length ties
    pub registration_order: usize,
}

impl Lender {
    pub fn new(canonical_name: &str, registration_order: usize) -> Self {
        Lender {
            canonical_name: canonical_name.to_string(),
            aliases: Vec::new(),
            registration_order,
        }
    }

    /// Add a normalized alias; returns false if it was already present
    pub fn add_alias(&mut self, alias: String) -> bool {
        if self.aliases.contains(&alias) {
            return false;
        }
        self.aliases.push(alias);
        true
    }
}

// ============================================================================
// LENDER ALIAS TABLE
// ============================================================================

/// Canonical lender → aliases, validated and normalized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LenderAliasTable {
    lenders: Vec<Lender>,
}

impl LenderAliasTable {
    /// Build from config entries, failing on the first bad entry
    pub fn from_entries(entries: &[LenderEntry]) -> Result<Self, ConfigError> {
        let mut lenders: Vec<Lender> = Vec::with_capacity(entries.len());
        let mut owner_of: HashMap<String, String> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyLenderName { index });
            }
            if lenders.iter().any(|l| l.canonical_name == name) {
                return Err(ConfigError::DuplicateLender {
                    name: name.to_string(),
                });
            }

            let mut lender = Lender::new(name, index);

            for raw_alias in &entry.aliases {
                let alias = normalize_description(raw_alias);
                if alias.is_empty() {
                    return Err(ConfigError::EmptyAlias {
                        lender: name.to_string(),
                        alias: raw_alias.clone(),
                    });
                }

                match owner_of.get(&alias) {
                    Some(owner) if owner != name => {
                        return Err(ConfigError::DuplicateAlias {
                            alias,
                            first: owner.clone(),
                            second: name.to_string(),
                        });
                    }
                    Some(_) => continue,
                    None => {
                        owner_of.insert(alias.clone(), name.to_string());
                        lender.add_alias(alias);
                    }
                }
            }

            lenders.push(lender);
        }

        Ok(LenderAliasTable { lenders })
    }

    /// Lenders in registration order
    pub fn lenders(&self) -> &[Lender] {
        &self.lenders
    }

    pub fn count(&self) -> usize {
        self.lenders.len()
    }

    pub fn alias_count(&self) -> usize {
        self.lenders.iter().map(|l| l.aliases.len()).sum()
    }

    pub fn find_by_name(&self, canonical_name: &str) -> Option<&Lender> {
        self.lenders.iter().find(|l| l.canonical_name == canonical_name)
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Normalize statement text for alias matching
///
/// - Uppercase
/// - Every non-alphanumeric character becomes a space ("ONDECK-CAPITAL*PMT" → "ONDECK CAPITAL PMT")
/// - Whitespace collapsed, trimmed
pub fn normalize_description(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase, drop punctuation outright, collapse whitespace
///
/// Fallback form for dotted abbreviations: "I.O.U. FINANCIAL" → "IOU FINANCIAL"
pub fn strip_punctuation(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
