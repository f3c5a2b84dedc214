//! Transfer reconciliation data types.

use buchfink_shared::types::{AccountId, AccountMappingId, Iban};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// Relates an IBAN to one of the user's own accounts.
///
/// Presence of a mapping makes the IBAN "internal"; absence means the
/// counterparty is external.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMapping {
    /// Unique identifier.
    pub id: AccountMappingId,
    /// The mapped IBAN.
    pub iban: Iban,
    /// The own account behind the IBAN.
    pub account_id: AccountId,
    /// Date of the account's opening balance, when recorded.
    ///
    /// Transfers booked before this date pre-date the account's own
    /// history and need an opening-balance adjustment downstream.
    pub opening_balance_date: Option<NaiveDate>,
}

/// Kind of internal transfer, derived from the counterparty account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Counterparty is an own asset account.
    Asset,
    /// Counterparty is an own liability account; booked one-sided and
    /// never reconciled against a mirrored leg.
    Liability,
}

/// Context for a bank transaction recognized as an internal transfer.
#[derive(Debug, Clone)]
pub struct TransferContext {
    /// The own account behind the counterparty IBAN.
    pub account: Account,
    /// Transfer kind.
    pub kind: TransferKind,
    /// Opening-balance date of the counterparty account, if recorded.
    pub opening_balance_date: Option<NaiveDate>,
}
