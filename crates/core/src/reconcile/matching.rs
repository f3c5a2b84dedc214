//! Transfer matching against already-imported ledger transactions.
//!
//! Matching is a two-phase lookup: an exact probe over the stored
//! transfer-identity hash, then a fuzzy scan over candidates sharing the
//! counterparty IBAN. The phases are deliberately separate functions so
//! the selection policy of each stays independently testable.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::META_TRANSFER_HASH;
use crate::ledger::Transaction;
use crate::repository::{RepositoryError, TransactionRepository};

/// Looks up the transaction carrying the given transfer-identity hash.
///
/// Both statements of a transfer produce the same hash, so a hit means the
/// mirrored side was already imported and linked.
///
/// # Errors
///
/// Propagates repository failures.
pub fn exact_transfer_match<R>(
    repo: &R,
    transfer_hash: &str,
) -> Result<Option<Transaction>, RepositoryError>
where
    R: TransactionRepository + ?Sized,
{
    let matches = repo.find_by_metadata(META_TRANSFER_HASH, transfer_hash)?;
    Ok(matches.into_iter().next())
}

/// Scans candidates for a transfer counterpart without a stored hash.
///
/// A candidate matches when its booked amount equals the absolute bank
/// amount and its date lies within `tolerance_days` of the booking date.
/// Selection is deterministic: smallest date distance wins, ties broken by
/// earlier date, then smaller id - never by repository iteration order.
#[must_use]
pub fn fuzzy_transfer_match(
    candidates: Vec<Transaction>,
    amount: Decimal,
    booking_date: NaiveDate,
    tolerance_days: i64,
) -> Option<Transaction> {
    let amount = amount.abs();
    candidates
        .into_iter()
        .filter(|t| {
            let distance = (t.date() - booking_date).num_days().abs();
            distance <= tolerance_days && t.totals().debit_total == amount
        })
        .min_by_key(|t| {
            let distance = (t.date() - booking_date).num_days().abs();
            (distance, t.date(), t.id())
        })
}
