//! Transfer reconciliation service.

use buchfink_shared::config::ReconciliationConfig;
use buchfink_shared::types::Iban;
use serde_json::json;
use tracing::{info, warn};

use super::META_TRANSFER_HASH;
use super::error::ReconcileError;
use super::matching::{exact_transfer_match, fuzzy_transfer_match};
use super::types::{TransferContext, TransferKind};
use crate::account::{Account, AccountType};
use crate::bank::BankTransaction;
use crate::ledger::{EntryRuleService, EntryType, PreservedLeg, Transaction};
use crate::repository::{AccountMappingRepository, AccountRepository, TransactionRepository};

/// Detects and converts transactions between the user's own accounts.
///
/// State machine per transaction: external -> (mapping discovered) ->
/// internal-transfer candidate -> (convert) -> internal transfer. The
/// converted state is terminal; re-running reconciliation on a converted
/// transaction is a no-op.
pub struct TransferReconciler<'a, A, T, M>
where
    A: AccountRepository + ?Sized,
    T: TransactionRepository + ?Sized,
    M: AccountMappingRepository + ?Sized,
{
    accounts: &'a A,
    transactions: &'a T,
    mappings: &'a M,
    config: ReconciliationConfig,
}

impl<'a, A, T, M> TransferReconciler<'a, A, T, M>
where
    A: AccountRepository + ?Sized,
    T: TransactionRepository + ?Sized,
    M: AccountMappingRepository + ?Sized,
{
    /// Creates a reconciler over the given ports.
    pub fn new(
        accounts: &'a A,
        transactions: &'a T,
        mappings: &'a M,
        config: ReconciliationConfig,
    ) -> Self {
        Self {
            accounts,
            transactions,
            mappings,
            config,
        }
    }

    /// Decides whether a bank transaction's counterparty is one of the
    /// user's own accounts.
    ///
    /// `None` means the counterparty is external (no IBAN delivered, or no
    /// mapping for it). A context is returned for mapped asset and
    /// liability accounts, carrying the opening-balance date when known.
    ///
    /// # Errors
    ///
    /// Fails when the mapping points at a missing account or one that is
    /// neither asset nor liability.
    pub fn detect_transfer(
        &self,
        bank_txn: &BankTransaction,
    ) -> Result<Option<TransferContext>, ReconcileError> {
        let Some(counterparty_iban) = &bank_txn.applicant_iban else {
            return Ok(None);
        };
        let Some(mapping) = self.mappings.find_by_iban(counterparty_iban)? else {
            return Ok(None);
        };

        let account = self
            .accounts
            .find_by_id(mapping.account_id)?
            .ok_or(ReconcileError::AccountNotFound(mapping.account_id))?;

        let kind = match account.account_type {
            AccountType::Asset => TransferKind::Asset,
            AccountType::Liability => TransferKind::Liability,
            other => {
                return Err(ReconcileError::UnexpectedAccountType {
                    account_id: account.id,
                    expected: "asset or liability account",
                    actual: other,
                });
            }
        };

        Ok(Some(TransferContext {
            account,
            kind,
            opening_balance_date: mapping.opening_balance_date,
        }))
    }

    /// Finds the already-imported counterpart of a transfer, if any.
    ///
    /// Tries the exact transfer-identity hash first; falls back to a fuzzy
    /// scan over transactions sharing the counterparty IBAN.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn find_matching_transfer(
        &self,
        bank_txn: &BankTransaction,
        source_iban: &Iban,
        counterparty_iban: &Iban,
    ) -> Result<Option<Transaction>, ReconcileError> {
        let hash = bank_txn.compute_transfer_identity_hash(source_iban, counterparty_iban);
        if let Some(exact) = exact_transfer_match(self.transactions, &hash)? {
            return Ok(Some(exact));
        }

        let candidates = self.transactions.find_by_counterparty_iban(counterparty_iban)?;
        Ok(fuzzy_transfer_match(
            candidates,
            bank_txn.amount,
            bank_txn.booking_date,
            self.config.transfer_match_tolerance_days,
        ))
    }

    /// Converts an imported transaction into an internal transfer to or
    /// from the given own asset account.
    ///
    /// Returns `false` without touching the transaction when it is already
    /// converted or carries no income/expense leg to replace. Otherwise the
    /// category leg is swapped for the missing transfer leg, description,
    /// counterparty and metadata are updated, and postedness is restored.
    /// The entry count never changes: a 2-entry import stays a 2-entry
    /// transfer.
    ///
    /// # Errors
    ///
    /// Propagates ledger-rule violations and repository failures.
    pub fn convert_to_internal_transfer(
        &self,
        transaction: &mut Transaction,
        new_asset_account: &Account,
        counterparty_iban: &Iban,
        source_iban: Option<&Iban>,
    ) -> Result<bool, ReconcileError> {
        if transaction.is_internal_transfer() {
            return Ok(false);
        }
        let Some(result_entry) = transaction.find_result_entry() else {
            return Ok(false);
        };

        let amount = result_entry.amount();
        let money_out = result_entry.entry_type() == EntryType::Debit;
        let Some(own_account) = Self::statement_account(transaction) else {
            return Ok(false);
        };
        let preserved = !transaction.protected_entry_ids().is_empty();

        // Money out: own account is the credited source, the new account
        // receives. Money in: the new account is the source, own receives.
        let (specs, description) = if money_out {
            let leg = if preserved {
                PreservedLeg::Source
            } else {
                PreservedLeg::None
            };
            (
                EntryRuleService::internal_transfer(&own_account, new_asset_account, amount, leg)?,
                format!("Internal transfer to {}", new_asset_account.name),
            )
        } else {
            let leg = if preserved {
                PreservedLeg::Destination
            } else {
                PreservedLeg::None
            };
            (
                EntryRuleService::internal_transfer(new_asset_account, &own_account, amount, leg)?,
                format!("Internal transfer from {}", new_asset_account.name),
            )
        };

        let was_posted = transaction.is_posted();
        if was_posted {
            transaction.unpost()?;
        }

        transaction.replace_unprotected_entries(specs)?;
        transaction.update_description(description)?;
        transaction.update_counterparty(
            Some(new_asset_account.name.clone()),
            Some(counterparty_iban.clone()),
        )?;
        if let Some(source_iban) = source_iban {
            let hash = BankTransaction::compute_transfer_hash(
                source_iban,
                counterparty_iban,
                transaction.date(),
                amount.amount,
            );
            transaction.set_metadata(META_TRANSFER_HASH, json!(hash))?;
        }
        transaction.mark_internal_transfer()?;

        if was_posted {
            transaction.post()?;
        }
        self.transactions.save(transaction)?;

        info!(
            id = %transaction.id(),
            account = %new_asset_account.name,
            "converted transaction to internal transfer"
        );
        Ok(true)
    }

    /// Converts an imported transaction into a payment against the given
    /// own liability account.
    ///
    /// Money leaving the statement account reduces the debt (debit the
    /// liability); money arriving draws on it (credit the liability).
    /// Same no-op and restoration semantics as the internal-transfer
    /// conversion.
    ///
    /// # Errors
    ///
    /// Propagates ledger-rule violations and repository failures.
    pub fn convert_to_liability_payment(
        &self,
        transaction: &mut Transaction,
        liability_account: &Account,
        counterparty_iban: &Iban,
        source_iban: Option<&Iban>,
    ) -> Result<bool, ReconcileError> {
        if transaction.is_internal_transfer() {
            return Ok(false);
        }
        let Some(result_entry) = transaction.find_result_entry() else {
            return Ok(false);
        };

        let amount = result_entry.amount();
        let is_payment_out = result_entry.entry_type() == EntryType::Debit;
        let Some(own_account) = Self::statement_account(transaction) else {
            return Ok(false);
        };
        let asset_preserved = !transaction.protected_entry_ids().is_empty();

        let specs = EntryRuleService::liability_payment(
            &own_account,
            liability_account,
            amount,
            is_payment_out,
            asset_preserved,
        )?;
        let description = if is_payment_out {
            format!("Payment to {}", liability_account.name)
        } else {
            format!("Draw on {}", liability_account.name)
        };

        let was_posted = transaction.is_posted();
        if was_posted {
            transaction.unpost()?;
        }

        transaction.replace_unprotected_entries(specs)?;
        transaction.update_description(description)?;
        transaction.update_counterparty(
            Some(liability_account.name.clone()),
            Some(counterparty_iban.clone()),
        )?;
        if let Some(source_iban) = source_iban {
            let hash = BankTransaction::compute_transfer_hash(
                source_iban,
                counterparty_iban,
                transaction.date(),
                amount.amount,
            );
            transaction.set_metadata(META_TRANSFER_HASH, json!(hash))?;
        }
        transaction.mark_internal_transfer()?;

        if was_posted {
            transaction.post()?;
        }
        self.transactions.save(transaction)?;

        info!(
            id = %transaction.id(),
            account = %liability_account.name,
            "converted transaction to liability payment"
        );
        Ok(true)
    }

    /// Converts all unreconciled transactions whose counterparty IBAN now
    /// maps to a newly added own asset account.
    ///
    /// Per-item failures are logged and do not abort the batch: one
    /// malformed historical transaction must not block reconciling the
    /// rest of the account's history. Returns the number of successful
    /// conversions.
    ///
    /// # Errors
    ///
    /// Fails only when the candidate set itself cannot be fetched.
    pub fn reconcile_for_new_account(
        &self,
        iban: &Iban,
        asset_account: &Account,
    ) -> Result<usize, ReconcileError> {
        self.reconcile_candidates(iban, |txn, source_iban| {
            self.convert_to_internal_transfer(txn, asset_account, iban, source_iban)
        })
    }

    /// Converts all unreconciled transactions whose counterparty IBAN now
    /// maps to a newly added own liability account.
    ///
    /// Same partial-success semantics as `reconcile_for_new_account`.
    ///
    /// # Errors
    ///
    /// Fails only when the candidate set itself cannot be fetched.
    pub fn reconcile_liability_for_new_account(
        &self,
        iban: &Iban,
        liability_account: &Account,
    ) -> Result<usize, ReconcileError> {
        self.reconcile_candidates(iban, |txn, source_iban| {
            self.convert_to_liability_payment(txn, liability_account, iban, source_iban)
        })
    }

    fn reconcile_candidates<F>(&self, iban: &Iban, mut convert: F) -> Result<usize, ReconcileError>
    where
        F: FnMut(&mut Transaction, Option<&Iban>) -> Result<bool, ReconcileError>,
    {
        let candidates = self.transactions.find_by_counterparty_iban(iban)?;
        let total = candidates.len();
        let mut converted = 0;

        for mut transaction in candidates {
            if transaction.is_internal_transfer() {
                continue;
            }
            let source_iban = transaction.source_iban().cloned();
            match convert(&mut transaction, source_iban.as_ref()) {
                Ok(true) => converted += 1,
                Ok(false) => {}
                Err(error) => {
                    warn!(
                        id = %transaction.id(),
                        error = %error,
                        "skipping transaction that failed to reconcile"
                    );
                }
            }
        }

        info!(iban = %iban, converted, total, "reconciled transactions for new account");
        Ok(converted)
    }

    /// Returns the account of the statement (balance-sheet) leg, falling
    /// back to the first entry's account when none exists.
    fn statement_account(transaction: &Transaction) -> Option<Account> {
        transaction
            .entries()
            .iter()
            .find(|e| e.account.account_type.is_balance_sheet())
            .or_else(|| transaction.entries().first())
            .map(|e| e.account.clone())
    }
}
