//! Turning stored bank transactions into ledger transactions.

use buchfink_shared::AppConfig;
use buchfink_shared::ErrorCategory;
use buchfink_shared::types::UserId;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use super::dedup::StoredBankTransaction;
use crate::account::Account;
use crate::ledger::{
    EntryRuleService, LedgerError, NewTransaction, Transaction,
};
use crate::repository::{BankTransactionRepository, RepositoryError, TransactionRepository};

/// Metadata key carrying the bank identity hash.
pub const META_IDENTITY_HASH: &str = "identity_hash";
/// Metadata key carrying the hash sequence.
pub const META_HASH_SEQUENCE: &str = "hash_sequence";
/// Metadata key carrying the classifier confidence of the booked category.
pub const META_CLASSIFIER_CONFIDENCE: &str = "classifier_confidence";

/// Errors from importing a stored bank transaction.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A ledger rule rejected the constructed transaction.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The storage layer failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// Returns the application-wide category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Ledger(e) => e.category(),
            Self::Repository(e) => e.category(),
        }
    }
}

/// Input for importing one stored bank transaction.
#[derive(Debug)]
pub struct ImportRequest<'a> {
    /// The stored row to import.
    pub stored: &'a StoredBankTransaction,
    /// The own asset/liability account the statement belongs to.
    pub payment_account: &'a Account,
    /// The category suggested for this transaction.
    pub category_account: &'a Account,
    /// Classifier confidence for the suggestion, when one was consulted.
    pub confidence: Option<Decimal>,
    /// Category used instead when the confidence is below the floor.
    pub fallback_category: Option<&'a Account>,
    /// The user the resulting transaction belongs to.
    pub user_id: UserId,
}

/// Builds ledger transactions from stored bank transactions.
pub struct BankImportService;

impl BankImportService {
    /// Imports one stored bank transaction into the ledger.
    ///
    /// Returns `Ok(None)` when the row was already imported: import is
    /// keyed by the stored row's id, so a sync retry after a failure
    /// re-attempts exactly the rows that did not make it.
    ///
    /// The bookkeeping direction follows the amount's sign; the booked
    /// amount is its absolute value. The transaction is posted immediately
    /// when `auto_post_imports` is set, then saved, and the stored row is
    /// marked imported.
    ///
    /// # Errors
    ///
    /// Propagates ledger-rule violations and repository failures; on error
    /// the stored row stays unimported.
    pub fn import_transaction<T, B>(
        transactions: &T,
        bank_repo: &B,
        request: &ImportRequest<'_>,
        config: &AppConfig,
    ) -> Result<Option<Transaction>, ImportError>
    where
        T: TransactionRepository + ?Sized,
        B: BankTransactionRepository + ?Sized,
    {
        let stored = request.stored;
        if stored.is_imported {
            info!(id = %stored.id, "bank transaction already imported, skipping");
            return Ok(None);
        }

        let bank_txn = &stored.transaction;
        let signed = bank_txn.signed_money();
        let direction = EntryRuleService::determine_direction_from_amount(&signed);

        let (category, confidence) = Self::resolve_category(request, config);
        let specs = EntryRuleService::simple(
            request.payment_account,
            category,
            signed.abs(),
            direction,
        )?;

        let description = if bank_txn.purpose.trim().is_empty() {
            bank_txn.applicant_name.clone()
        } else {
            bank_txn.purpose.clone()
        };

        let mut transaction = Transaction::bank_import(
            NewTransaction {
                user_id: request.user_id,
                date: bank_txn.booking_date,
                description,
                entries: specs,
                counterparty: Some(bank_txn.applicant_name.clone()),
                counterparty_iban: bank_txn.applicant_iban.clone(),
                source_iban: Some(stored.account_iban.clone()),
            },
            config.ledger.posting_currency,
        )?;

        transaction.set_metadata(META_IDENTITY_HASH, json!(stored.identity.hash))?;
        transaction.set_metadata(META_HASH_SEQUENCE, json!(stored.identity.sequence))?;
        if let Some(confidence) = confidence {
            transaction.set_metadata(META_CLASSIFIER_CONFIDENCE, json!(confidence.to_string()))?;
        }

        if config.ledger.auto_post_imports {
            transaction.post()?;
        }

        transactions.save(&transaction)?;
        bank_repo.mark_imported(stored.id)?;

        info!(
            id = %transaction.id(),
            stored_id = %stored.id,
            category = %category.name,
            "imported bank transaction"
        );
        Ok(Some(transaction))
    }

    /// Applies the confidence floor to the suggested category.
    fn resolve_category<'a>(
        request: &'a ImportRequest<'_>,
        config: &AppConfig,
    ) -> (&'a Account, Option<Decimal>) {
        match (request.confidence, request.fallback_category) {
            (Some(confidence), Some(fallback))
                if confidence < config.reconciliation.classifier_min_confidence =>
            {
                (fallback, Some(confidence))
            }
            (confidence, _) => (request.category_account, confidence),
        }
    }
}
