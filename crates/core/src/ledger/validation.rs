//! Business rule validation for ledger entries.

use buchfink_shared::types::Currency;
use rust_decimal::Decimal;

use super::entry::JournalEntry;
use super::error::LedgerError;
use super::types::{EntryType, TransactionTotals};

/// Validates that a set of journal entries forms a postable transaction.
///
/// Postable means: at least 2 entries, both sides present, every amount
/// positive and in the posting currency, and total debits equal to total
/// credits.
///
/// # Errors
///
/// Returns an error naming the first violated rule.
pub fn validate_entries(
    entries: &[JournalEntry],
    posting_currency: Currency,
) -> Result<(), LedgerError> {
    if entries.len() < 2 {
        return Err(LedgerError::InsufficientEntries);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for entry in entries {
        let amount = entry.amount();
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount);
        }
        if amount.currency != posting_currency {
            return Err(LedgerError::UnsupportedCurrency {
                actual: amount.currency,
                expected: posting_currency,
            });
        }

        match entry.entry_type() {
            EntryType::Debit => {
                total_debits += amount.amount;
                has_debit = true;
            }
            EntryType::Credit => {
                total_credits += amount.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerError::UnbalancedTransaction {
            debit: total_debits,
            credit: total_credits,
        });
    }

    Ok(())
}

/// Calculates transaction totals from entries.
#[must_use]
pub fn calculate_totals(entries: &[JournalEntry]) -> TransactionTotals {
    let debit_total: Decimal = entries.iter().map(|e| e.debit.amount).sum();
    let credit_total: Decimal = entries.iter().map(|e| e.credit.amount).sum();

    TransactionTotals::new(debit_total, credit_total)
}
