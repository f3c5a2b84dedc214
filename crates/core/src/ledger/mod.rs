//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries (debits and credits)
//! - The transaction aggregate with bank-leg protection
//! - Balance validation
//! - Stateless entry-construction rules
//! - Domain types for transaction creation
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod rules;
pub mod transaction;
pub mod types;
pub mod validation;

#[cfg(test)]
mod rules_props;
#[cfg(test)]
mod transaction_props;

pub use entry::JournalEntry;
pub use error::LedgerError;
pub use rules::EntryRuleService;
pub use transaction::Transaction;
pub use types::{
    EntryDirection, EntrySpec, EntryType, NewTransaction, PreservedLeg, TransactionSource,
    TransactionTotals,
};
pub use validation::{calculate_totals, validate_entries};
