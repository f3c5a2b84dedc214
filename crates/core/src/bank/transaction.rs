//! Raw bank transaction value object and its identity hashes.

use buchfink_shared::types::{Currency, Iban, Money};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A bank transaction as delivered by the banking client.
///
/// Amounts are signed from the perspective of the fetched account:
/// negative means money left it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Date the bank booked the transaction.
    pub booking_date: NaiveDate,
    /// Value date.
    pub value_date: NaiveDate,
    /// Signed amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Purpose / reference text ("Verwendungszweck").
    pub purpose: String,
    /// Counterparty name.
    pub applicant_name: String,
    /// Counterparty IBAN, when the bank delivers one.
    pub applicant_iban: Option<Iban>,
    /// Bank-side reference code.
    pub bank_reference: String,
}

impl BankTransaction {
    /// Returns the signed amount as money.
    #[must_use]
    pub fn signed_money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }

    /// Computes the content hash identifying this transaction on the given
    /// account.
    ///
    /// Two fetches of the same statement line produce the same hash; the
    /// ordinal disambiguation of truly identical siblings happens at the
    /// deduplication layer, not here.
    #[must_use]
    pub fn compute_identity_hash(&self, account_iban: &Iban) -> String {
        hash_fields(&[
            account_iban.as_str(),
            &self.booking_date.to_string(),
            &normalize_amount(self.amount),
            &self.currency.to_string(),
            &self.purpose,
            &self.applicant_name,
            &self.bank_reference,
        ])
    }

    /// Computes the transfer-identity hash between this transaction's two
    /// endpoint accounts.
    ///
    /// Both sides of a transfer hash identically because the IBAN pair is
    /// ordered and the amount taken absolute.
    #[must_use]
    pub fn compute_transfer_identity_hash(&self, iban_a: &Iban, iban_b: &Iban) -> String {
        Self::compute_transfer_hash(iban_a, iban_b, self.booking_date, self.amount)
    }

    /// Computes a transfer hash from raw parts.
    ///
    /// Used for lookups when no `BankTransaction` value is at hand.
    #[must_use]
    pub fn compute_transfer_hash(
        iban_a: &Iban,
        iban_b: &Iban,
        booking_date: NaiveDate,
        amount: Decimal,
    ) -> String {
        let (low, high) = if iban_a.as_str() <= iban_b.as_str() {
            (iban_a, iban_b)
        } else {
            (iban_b, iban_a)
        };
        hash_fields(&[
            low.as_str(),
            high.as_str(),
            &booking_date.to_string(),
            &normalize_amount(amount.abs()),
        ])
    }
}

/// Joins fields with a unit separator and returns the hex SHA-256 digest.
fn hash_fields(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update([0x1f]);
        }
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Renders an amount without trailing zeros so `3.10` and `3.1` agree.
fn normalize_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}
