//! Transaction aggregate.
//!
//! All entry mutation goes through this type so the protection and balance
//! rules cannot be bypassed: the entry list is never handed out mutably.

use std::collections::BTreeMap;

use buchfink_shared::types::{Currency, Iban, JournalEntryId, Money, TransactionId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;
use super::error::LedgerError;
use super::types::{EntrySpec, EntryType, NewTransaction, TransactionSource, TransactionTotals};
use super::validation::{calculate_totals, validate_entries};
use crate::account::Account;

/// A financial transaction consisting of journal entries.
///
/// Invariants owned by this aggregate:
/// - total debits equal total credits whenever the transaction is posted;
/// - at least 2 entries exist whenever the transaction is posted;
/// - on bank-imported transactions, entries on asset/liability accounts are
///   protected: they mirror a bank statement line and survive every entry
///   mutation (only a reversal transaction may correct them);
/// - a posted transaction refuses mutation until explicitly unposted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    user_id: UserId,
    date: NaiveDate,
    description: String,
    currency: Currency,
    counterparty: Option<String>,
    counterparty_iban: Option<Iban>,
    source: TransactionSource,
    source_iban: Option<Iban>,
    is_internal_transfer: bool,
    is_posted: bool,
    entries: Vec<JournalEntry>,
    metadata: BTreeMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a manually entered draft transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is empty, fewer than 2 entries
    /// are given, or any entry violates amount/currency/account rules.
    pub fn manual(input: NewTransaction, posting_currency: Currency) -> Result<Self, LedgerError> {
        Self::create(input, posting_currency, TransactionSource::Manual)
    }

    /// Creates a draft transaction sourced from a bank import.
    ///
    /// The source is fixed for the lifetime of the transaction; it is what
    /// makes the asset/liability legs protected.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is empty, fewer than 2 entries
    /// are given, or any entry violates amount/currency/account rules.
    pub fn bank_import(
        input: NewTransaction,
        posting_currency: Currency,
    ) -> Result<Self, LedgerError> {
        Self::create(input, posting_currency, TransactionSource::BankImport)
    }

    fn create(
        input: NewTransaction,
        posting_currency: Currency,
        source: TransactionSource,
    ) -> Result<Self, LedgerError> {
        if input.description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if input.entries.len() < 2 {
            return Err(LedgerError::InsufficientEntries);
        }

        let mut entries = Vec::with_capacity(input.entries.len());
        for spec in input.entries {
            entries.push(Self::build_entry(spec, posting_currency)?);
        }

        let now = Utc::now();
        Ok(Self {
            id: TransactionId::new(),
            user_id: input.user_id,
            date: input.date,
            description: input.description,
            currency: posting_currency,
            counterparty: input.counterparty,
            counterparty_iban: input.counterparty_iban,
            source,
            source_iban: input.source_iban,
            is_internal_transfer: false,
            is_posted: false,
            entries,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn build_entry(spec: EntrySpec, posting_currency: Currency) -> Result<JournalEntry, LedgerError> {
        if spec.amount.currency != posting_currency {
            return Err(LedgerError::UnsupportedCurrency {
                actual: spec.amount.currency,
                expected: posting_currency,
            });
        }
        if !spec.account.is_active {
            return Err(LedgerError::AccountInactive(spec.account.id));
        }
        JournalEntry::from_spec(spec)
    }

    // ========== Read-only views ==========

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// The user the transaction belongs to.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Booking date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Posting currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Counterparty name, if known.
    #[must_use]
    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    /// Counterparty IBAN, if known.
    #[must_use]
    pub fn counterparty_iban(&self) -> Option<&Iban> {
        self.counterparty_iban.as_ref()
    }

    /// Where the transaction originated.
    #[must_use]
    pub fn source(&self) -> TransactionSource {
        self.source
    }

    /// IBAN of the own account the transaction was sourced from.
    #[must_use]
    pub fn source_iban(&self) -> Option<&Iban> {
        self.source_iban.as_ref()
    }

    /// Whether the transaction has been recognized as an internal transfer.
    #[must_use]
    pub fn is_internal_transfer(&self) -> bool {
        self.is_internal_transfer
    }

    /// Whether the transaction is posted (finalized) or a draft.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.is_posted
    }

    /// The journal entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Looks up a single entry.
    #[must_use]
    pub fn entry(&self, entry_id: JournalEntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Free-form metadata.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Looks up a single metadata value.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Debit/credit totals.
    #[must_use]
    pub fn totals(&self) -> TransactionTotals {
        calculate_totals(&self.entries)
    }

    /// IDs of all protected entries.
    ///
    /// An entry is protected when the transaction was imported from a bank
    /// and the entry posts to a balance-sheet (asset/liability) account:
    /// that leg mirrors the bank's own statement and must stay intact.
    #[must_use]
    pub fn protected_entry_ids(&self) -> Vec<JournalEntryId> {
        self.entries
            .iter()
            .filter(|e| self.is_protected(e))
            .map(|e| e.id)
            .collect()
    }

    /// Returns the first entry posting to an income/expense account.
    ///
    /// This is the category leg of a simple bank-imported transaction.
    #[must_use]
    pub fn find_result_entry(&self) -> Option<&JournalEntry> {
        self.entries
            .iter()
            .find(|e| e.account.account_type.is_result())
    }

    fn is_protected(&self, entry: &JournalEntry) -> bool {
        self.source == TransactionSource::BankImport && entry.account.account_type.is_balance_sheet()
    }

    // ========== Mutation commands ==========

    /// Appends a debit entry. No balance check happens here; balance is
    /// enforced at `post()`.
    ///
    /// # Errors
    ///
    /// Fails on posted transactions and on amount/currency/account
    /// violations.
    pub fn add_debit(
        &mut self,
        account: Account,
        amount: Money,
    ) -> Result<JournalEntryId, LedgerError> {
        self.add_spec(EntrySpec::debit(account, amount))
    }

    /// Appends a credit entry. No balance check happens here; balance is
    /// enforced at `post()`.
    ///
    /// # Errors
    ///
    /// Fails on posted transactions and on amount/currency/account
    /// violations.
    pub fn add_credit(
        &mut self,
        account: Account,
        amount: Money,
    ) -> Result<JournalEntryId, LedgerError> {
        self.add_spec(EntrySpec::credit(account, amount))
    }

    fn add_spec(&mut self, spec: EntrySpec) -> Result<JournalEntryId, LedgerError> {
        self.require_draft()?;
        let entry = Self::build_entry(spec, self.currency)?;
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        Ok(id)
    }

    /// Removes an entry.
    ///
    /// # Errors
    ///
    /// Fails with `ProtectedEntry` on bank-import asset/liability legs,
    /// `EntryNotFound` for unknown ids, and `CannotModifyPosted` while
    /// posted.
    pub fn remove_entry(&mut self, entry_id: JournalEntryId) -> Result<(), LedgerError> {
        self.require_draft()?;
        let index = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        if self.is_protected(&self.entries[index]) {
            return Err(LedgerError::ProtectedEntry(entry_id));
        }
        self.entries.remove(index);
        self.touch();
        Ok(())
    }

    /// Removes all unprotected entries, leaving protected ones intact.
    ///
    /// This is the mechanism that lets a bank-imported transaction be
    /// recategorized without disturbing the reconciled bank leg.
    ///
    /// # Errors
    ///
    /// Fails with `CannotModifyPosted` while posted.
    pub fn clear_entries(&mut self) -> Result<(), LedgerError> {
        self.require_draft()?;
        let protected: Vec<JournalEntryId> = self.protected_entry_ids();
        self.entries.retain(|e| protected.contains(&e.id));
        self.touch();
        Ok(())
    }

    /// Replaces all unprotected entries with the given specs.
    ///
    /// Used for splitting one category into several. The specs are
    /// validated before anything is removed, so a failed call leaves the
    /// transaction unchanged.
    ///
    /// # Errors
    ///
    /// Fails with `CannotModifyPosted` while posted and on
    /// amount/currency/account violations.
    pub fn replace_unprotected_entries(
        &mut self,
        specs: Vec<EntrySpec>,
    ) -> Result<(), LedgerError> {
        self.require_draft()?;
        let mut new_entries = Vec::with_capacity(specs.len());
        for spec in specs {
            new_entries.push(Self::build_entry(spec, self.currency)?);
        }
        let protected: Vec<JournalEntryId> = self.protected_entry_ids();
        self.entries.retain(|e| protected.contains(&e.id));
        self.entries.append(&mut new_entries);
        self.touch();
        Ok(())
    }

    /// Posts the transaction.
    ///
    /// # Errors
    ///
    /// Fails with `AlreadyPosted` when posted, or with the first violated
    /// balance rule; on failure the posting state is unchanged.
    pub fn post(&mut self) -> Result<(), LedgerError> {
        if self.is_posted {
            return Err(LedgerError::AlreadyPosted);
        }
        validate_entries(&self.entries, self.currency)?;
        self.is_posted = true;
        self.touch();
        Ok(())
    }

    /// Reverts the transaction to a draft.
    ///
    /// Callers that want to preserve postedness across an edit own the
    /// unpost -> mutate -> repost sequencing.
    ///
    /// # Errors
    ///
    /// Fails with `AlreadyDraft` when not posted.
    pub fn unpost(&mut self) -> Result<(), LedgerError> {
        if !self.is_posted {
            return Err(LedgerError::AlreadyDraft);
        }
        self.is_posted = false;
        self.touch();
        Ok(())
    }

    /// Updates the description.
    ///
    /// # Errors
    ///
    /// Fails with `EmptyDescription` on blank input and
    /// `CannotModifyPosted` while posted.
    pub fn update_description(&mut self, description: impl Into<String>) -> Result<(), LedgerError> {
        self.require_draft()?;
        let description = description.into();
        if description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        self.description = description;
        self.touch();
        Ok(())
    }

    /// Updates the counterparty fields.
    ///
    /// # Errors
    ///
    /// Fails with `CannotModifyPosted` while posted.
    pub fn update_counterparty(
        &mut self,
        name: Option<String>,
        iban: Option<Iban>,
    ) -> Result<(), LedgerError> {
        self.require_draft()?;
        self.counterparty = name;
        self.counterparty_iban = iban;
        self.touch();
        Ok(())
    }

    /// Sets a metadata value.
    ///
    /// # Errors
    ///
    /// Fails with `CannotModifyPosted` while posted.
    pub fn set_metadata(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), LedgerError> {
        self.require_draft()?;
        self.metadata.insert(key.into(), value);
        self.touch();
        Ok(())
    }

    /// Marks the transaction as an internal transfer.
    ///
    /// # Errors
    ///
    /// Fails with `CannotModifyPosted` while posted.
    pub fn mark_internal_transfer(&mut self) -> Result<(), LedgerError> {
        self.require_draft()?;
        self.is_internal_transfer = true;
        self.touch();
        Ok(())
    }

    /// Builds a reversing draft transaction with every entry side swapped.
    ///
    /// This is the only sanctioned way to correct a protected bank leg:
    /// the original stays untouched and the reversal cancels it.
    ///
    /// # Errors
    ///
    /// Propagates entry-construction failures; a balanced original always
    /// reverses cleanly.
    pub fn reversal(&self, date: NaiveDate, reason: &str) -> Result<Self, LedgerError> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let swapped = match entry.entry_type() {
                EntryType::Debit => JournalEntry::credit(entry.account.clone(), entry.amount())?,
                EntryType::Credit => JournalEntry::debit(entry.account.clone(), entry.amount())?,
            };
            entries.push(swapped);
        }

        let now = Utc::now();
        Ok(Self {
            id: TransactionId::new(),
            user_id: self.user_id,
            date,
            description: format!("Reversal of '{}'. Reason: {reason}", self.description),
            currency: self.currency,
            counterparty: self.counterparty.clone(),
            counterparty_iban: self.counterparty_iban.clone(),
            source: TransactionSource::Manual,
            source_iban: self.source_iban.clone(),
            is_internal_transfer: false,
            is_posted: false,
            entries,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn require_draft(&self) -> Result<(), LedgerError> {
        if self.is_posted {
            return Err(LedgerError::CannotModifyPosted);
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
