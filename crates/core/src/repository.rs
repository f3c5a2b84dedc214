//! Persistence ports implemented by the embedding application.
//!
//! The engine never talks to storage directly; it is handed these traits
//! and drives them synchronously. Commit/rollback is the caller's
//! responsibility: either a full edit sequence is persisted or the
//! in-memory aggregate is discarded.

use buchfink_shared::ErrorCategory;
use buchfink_shared::types::{AccountId, BankTransactionId, Iban, TransactionId};
use thiserror::Error;

use crate::account::Account;
use crate::bank::dedup::{IdentityKey, StoredBankTransaction};
use crate::ledger::Transaction;
use crate::reconcile::types::AccountMapping;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The storage layer failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Returns the application-wide category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Conflict(_) | Self::Storage(_) => ErrorCategory::Storage,
        }
    }
}

/// Lookup port for chart-of-accounts entries.
pub trait AccountRepository {
    /// Finds an account by id.
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Finds an account by its IBAN.
    fn find_by_iban(&self, iban: &Iban) -> Result<Option<Account>, RepositoryError>;

    /// Finds an account by its internal account number.
    fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, RepositoryError>;
}

/// Lookup and persistence port for ledger transactions.
pub trait TransactionRepository {
    /// Finds a transaction by id.
    fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError>;

    /// Finds all transactions carrying the given metadata value.
    fn find_by_metadata(&self, key: &str, value: &str)
    -> Result<Vec<Transaction>, RepositoryError>;

    /// Finds all transactions with the given counterparty IBAN.
    fn find_by_counterparty_iban(&self, iban: &Iban)
    -> Result<Vec<Transaction>, RepositoryError>;

    /// Persists the transaction (insert or update).
    fn save(&self, transaction: &Transaction) -> Result<(), RepositoryError>;
}

/// Lookup port for IBAN-to-own-account mappings.
pub trait AccountMappingRepository {
    /// Finds a mapping by IBAN; `None` means the IBAN is external.
    fn find_by_iban(&self, iban: &Iban) -> Result<Option<AccountMapping>, RepositoryError>;
}

/// Persistence port for stored bank transactions.
pub trait BankTransactionRepository {
    /// Finds a stored row by its composite identity key.
    fn find_by_identity(
        &self,
        identity: &IdentityKey,
    ) -> Result<Option<StoredBankTransaction>, RepositoryError>;

    /// Inserts a newly fetched row.
    fn insert(&self, stored: &StoredBankTransaction) -> Result<(), RepositoryError>;

    /// Marks a stored row as imported into the ledger.
    fn mark_imported(&self, id: BankTransactionId) -> Result<(), RepositoryError>;
}
