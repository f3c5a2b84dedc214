//! Application-wide error taxonomy.
//!
//! Every domain error in the core crates maps into one of these categories.
//! The embedding application translates categories into user-facing
//! responses; the core itself never swallows a validation or business-rule
//! failure.

use serde::{Deserialize, Serialize};

/// Category of a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input (empty description, zero amount, bad currency).
    Validation,
    /// A bookkeeping rule was violated (unbalanced transaction, protected
    /// entry mutation, invalid account type for the requested role).
    BusinessRule,
    /// A referenced entity does not exist.
    NotFound,
    /// The storage layer failed.
    Storage,
}

impl ErrorCategory {
    /// Returns the stable category code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::BusinessRule => "BUSINESS_RULE_VIOLATION",
            Self::NotFound => "NOT_FOUND",
            Self::Storage => "STORAGE_ERROR",
        }
    }

    /// Returns true if retrying the same call cannot succeed.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Validation | Self::BusinessRule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        assert_eq!(ErrorCategory::Validation.code(), "VALIDATION_ERROR");
        assert_eq!(ErrorCategory::BusinessRule.code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(ErrorCategory::NotFound.code(), "NOT_FOUND");
        assert_eq!(ErrorCategory::Storage.code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_permanent_categories() {
        assert!(ErrorCategory::Validation.is_permanent());
        assert!(ErrorCategory::BusinessRule.is_permanent());
        assert!(!ErrorCategory::NotFound.is_permanent());
        assert!(!ErrorCategory::Storage.is_permanent());
    }
}
