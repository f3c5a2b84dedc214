//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations,
//! including entry validation errors, account-role errors, protection
//! errors, and transaction state errors.

use buchfink_shared::ErrorCategory;
use buchfink_shared::types::{AccountId, Currency, JournalEntryId, MoneyError};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountType;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction description cannot be empty.
    #[error("Transaction description cannot be empty")]
    EmptyDescription,

    /// Entry amount cannot be zero.
    #[error("Entry amount cannot be zero")]
    ZeroAmount,

    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    /// Amount currency differs from the transaction's posting currency.
    #[error("Currency {actual} is not accepted here, expected {expected}")]
    UnsupportedCurrency {
        /// The offending currency.
        actual: Currency,
        /// The single accepted posting currency.
        expected: Currency,
    },

    /// Arithmetic across two currencies.
    #[error(transparent)]
    Money(#[from] MoneyError),

    // ========== Balance Errors ==========
    /// Transaction must have at least 2 entries.
    #[error("Transaction must have at least 2 entries")]
    InsufficientEntries,

    /// Transaction has only one side (all debits or all credits).
    #[error("Transaction must have both debit and credit entries")]
    SingleSided,

    /// Transaction is not balanced (debits != credits).
    #[error("Transaction is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Role Errors ==========
    /// Account has the wrong type for the requested bookkeeping role.
    #[error("Account {account_id} has type {actual}, expected {expected}")]
    InvalidAccountType {
        /// The offending account.
        account_id: AccountId,
        /// Description of the required role.
        expected: &'static str,
        /// The account's actual type.
        actual: AccountType,
    },

    /// Account is inactive and cannot take new entries.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== Protection Errors ==========
    /// Entry mirrors a bank statement line and cannot be removed or altered.
    #[error("Entry {0} is protected by a bank import and cannot be modified")]
    ProtectedEntry(JournalEntryId),

    // ========== Transaction State Errors ==========
    /// Cannot modify a posted transaction; unpost first.
    #[error("Cannot modify posted transaction")]
    CannotModifyPosted,

    /// Transaction is already posted.
    #[error("Transaction is already posted")]
    AlreadyPosted,

    /// Transaction is already a draft.
    #[error("Transaction is already a draft")]
    AlreadyDraft,

    // ========== Not Found ==========
    /// Entry not found on this transaction.
    #[error("Entry not found: {0}")]
    EntryNotFound(JournalEntryId),
}

impl LedgerError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::UnsupportedCurrency { .. } => "UNSUPPORTED_CURRENCY",
            Self::Money(_) => "CURRENCY_MISMATCH",
            Self::InsufficientEntries => "INSUFFICIENT_ENTRIES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::InvalidAccountType { .. } => "INVALID_ACCOUNT_TYPE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::ProtectedEntry(_) => "PROTECTED_ENTRY",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::AlreadyPosted => "ALREADY_POSTED",
            Self::AlreadyDraft => "ALREADY_DRAFT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
        }
    }

    /// Returns the application-wide category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDescription
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::UnsupportedCurrency { .. }
            | Self::Money(_) => ErrorCategory::Validation,

            Self::InsufficientEntries
            | Self::SingleSided
            | Self::UnbalancedTransaction { .. }
            | Self::InvalidAccountType { .. }
            | Self::AccountInactive(_)
            | Self::ProtectedEntry(_)
            | Self::CannotModifyPosted
            | Self::AlreadyPosted
            | Self::AlreadyDraft => ErrorCategory::BusinessRule,

            Self::EntryNotFound(_) => ErrorCategory::NotFound,
        }
    }
}
