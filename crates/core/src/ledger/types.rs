//! Ledger domain types for transaction creation and entry construction.
//!
//! This module defines the input and classification types used when
//! creating and mutating transactions in the double-entry bookkeeping
//! system.

use buchfink_shared::types::{Iban, Money, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Where a transaction originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    /// Entered by hand.
    Manual,
    /// Imported from a bank statement.
    BankImport,
}

/// Bookkeeping direction derived from a bank amount's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Money left the payment account.
    Expense,
    /// Money arrived on the payment account.
    Income,
}

/// Which leg of an internal transfer is already present and must not be
/// rebuilt.
///
/// A bank-imported transfer carries the statement leg of exactly one of the
/// two accounts: the credited source when money left it, the debited
/// destination when money arrived. Conversion preserves that leg and only
/// constructs the missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreservedLeg {
    /// Build both legs.
    None,
    /// The credited source leg already exists.
    Source,
    /// The debited destination leg already exists.
    Destination,
}

/// Specification for a single journal entry to be added to a transaction.
#[derive(Debug, Clone)]
pub struct EntrySpec {
    /// The account to post to.
    pub account: Account,
    /// The amount (must be positive).
    pub amount: Money,
    /// Whether this is a debit or credit entry.
    pub entry_type: EntryType,
}

impl EntrySpec {
    /// Creates a debit spec.
    #[must_use]
    pub fn debit(account: Account, amount: Money) -> Self {
        Self {
            account,
            amount,
            entry_type: EntryType::Debit,
        }
    }

    /// Creates a credit spec.
    #[must_use]
    pub fn credit(account: Account, amount: Money) -> Self {
        Self {
            account,
            amount,
            entry_type: EntryType::Credit,
        }
    }
}

/// Input for creating a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// Booking date.
    pub date: NaiveDate,
    /// Description (must be non-empty).
    pub description: String,
    /// The journal entries (must have at least 2).
    pub entries: Vec<EntrySpec>,
    /// Counterparty name, if known.
    pub counterparty: Option<String>,
    /// Counterparty IBAN, if known.
    pub counterparty_iban: Option<Iban>,
    /// IBAN of the own account the transaction was sourced from.
    pub source_iban: Option<Iban>,
}

/// Transaction totals for validation and display.
///
/// Contains the sum of debits and credits in the posting currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Whether the transaction is balanced (debits == credits).
    pub is_balanced: bool,
}

impl TransactionTotals {
    /// Creates new transaction totals from debit and credit sums.
    #[must_use]
    pub fn new(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            debit_total,
            credit_total,
            is_balanced: debit_total == credit_total,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_opposite() {
        assert_eq!(EntryType::Debit.opposite(), EntryType::Credit);
        assert_eq!(EntryType::Credit.opposite(), EntryType::Debit);
    }

    #[test]
    fn test_totals_balanced() {
        let totals = TransactionTotals::new(Decimal::new(10000, 2), Decimal::new(10000, 2));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = TransactionTotals::new(Decimal::new(10000, 2), Decimal::new(5000, 2));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::new(5000, 2));
    }
}
