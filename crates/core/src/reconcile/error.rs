//! Transfer reconciliation error types.

use buchfink_shared::ErrorCategory;
use buchfink_shared::types::{AccountId, TransactionId};
use thiserror::Error;

use crate::account::AccountType;
use crate::ledger::LedgerError;
use crate::repository::RepositoryError;

/// Errors that can occur during transfer reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The transaction to convert does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// The mapped account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The mapped account has the wrong type for the conversion.
    #[error("Account {account_id} has type {actual}, expected {expected}")]
    UnexpectedAccountType {
        /// The mapped account.
        account_id: AccountId,
        /// Description of the required type.
        expected: &'static str,
        /// The account's actual type.
        actual: AccountType,
    },

    /// A ledger rule rejected the conversion.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The storage layer failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReconcileError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UnexpectedAccountType { .. } => "UNEXPECTED_ACCOUNT_TYPE",
            Self::Ledger(e) => e.error_code(),
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the application-wide category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TransactionNotFound(_) | Self::AccountNotFound(_) => ErrorCategory::NotFound,
            Self::UnexpectedAccountType { .. } => ErrorCategory::BusinessRule,
            Self::Ledger(e) => e.category(),
            Self::Repository(e) => e.category(),
        }
    }
}
