//! Journal entry domain type.

use buchfink_shared::types::{JournalEntryId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{EntrySpec, EntryType};
use crate::account::Account;

/// A single posting line in a transaction.
///
/// Exactly one of debit/credit is positive; the other is the currency's
/// zero value. Both are always present so amount lookups never branch on
/// absence, only on side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub id: JournalEntryId,
    /// The account affected by this entry.
    pub account: Account,
    /// Debit amount (zero if this is a credit entry).
    pub debit: Money,
    /// Credit amount (zero if this is a debit entry).
    pub credit: Money,
}

impl JournalEntry {
    /// Creates a debit entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ZeroAmount`/`NegativeAmount` unless the amount
    /// is strictly positive.
    pub fn debit(account: Account, amount: Money) -> Result<Self, LedgerError> {
        Self::require_positive(&amount)?;
        Ok(Self {
            id: JournalEntryId::new(),
            account,
            credit: Money::zero(amount.currency),
            debit: amount,
        })
    }

    /// Creates a credit entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ZeroAmount`/`NegativeAmount` unless the amount
    /// is strictly positive.
    pub fn credit(account: Account, amount: Money) -> Result<Self, LedgerError> {
        Self::require_positive(&amount)?;
        Ok(Self {
            id: JournalEntryId::new(),
            account,
            debit: Money::zero(amount.currency),
            credit: amount,
        })
    }

    /// Creates an entry from a spec.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ZeroAmount`/`NegativeAmount` unless the amount
    /// is strictly positive.
    pub fn from_spec(spec: EntrySpec) -> Result<Self, LedgerError> {
        match spec.entry_type {
            EntryType::Debit => Self::debit(spec.account, spec.amount),
            EntryType::Credit => Self::credit(spec.account, spec.amount),
        }
    }

    fn require_positive(amount: &Money) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount);
        }
        Ok(())
    }

    /// Whether this is a debit or credit entry.
    #[must_use]
    pub fn entry_type(&self) -> EntryType {
        if self.debit.is_positive() {
            EntryType::Debit
        } else {
            EntryType::Credit
        }
    }

    /// Returns the posted amount (the positive side).
    #[must_use]
    pub fn amount(&self) -> Money {
        match self.entry_type() {
            EntryType::Debit => self.debit,
            EntryType::Credit => self.credit,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type() {
            EntryType::Debit => self.debit.amount,
            EntryType::Credit => -self.credit.amount,
        }
    }
}
