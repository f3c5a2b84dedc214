//! Property-based tests for the transaction aggregate invariants.

use buchfink_shared::types::{AccountId, Currency, Money, UserId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::transaction::Transaction;
use super::types::{EntrySpec, NewTransaction};
use crate::account::{Account, AccountType};

fn account(account_type: AccountType) -> Account {
    Account {
        id: AccountId::new(),
        name: "prop".to_string(),
        account_type,
        account_number: "1000".to_string(),
        iban: None,
        default_currency: Currency::Eur,
        is_active: true,
        parent_id: None,
    }
}

fn eur(cents: i64) -> Money {
    Money::new(Decimal::new(cents, 2), Currency::Eur)
}

/// Strategy for positive amounts from 0.01 to 1,000,000.00.
fn positive_cents() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

fn bank_import(category_cents: i64, payment_cents: i64) -> Transaction {
    Transaction::bank_import(
        NewTransaction {
            user_id: UserId::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "import".to_string(),
            entries: vec![
                EntrySpec::debit(account(AccountType::Expense), eur(category_cents)),
                EntrySpec::credit(account(AccountType::Asset), eur(payment_cents)),
            ],
            counterparty: None,
            counterparty_iban: None,
            source_iban: None,
        },
        Currency::Eur,
    )
    .expect("valid draft")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A transaction posts iff its debit and credit totals agree, and a
    /// failed post leaves it a draft.
    #[test]
    fn prop_post_enforces_balance(
        debit_cents in positive_cents(),
        credit_cents in positive_cents(),
    ) {
        let mut txn = bank_import(debit_cents, credit_cents);
        let result = txn.post();

        if debit_cents == credit_cents {
            prop_assert!(result.is_ok());
            prop_assert!(txn.is_posted());
        } else {
            prop_assert!(
                matches!(result, Err(LedgerError::UnbalancedTransaction { .. })),
                "expected UnbalancedTransaction error"
            );
            prop_assert!(!txn.is_posted());
        }
    }

    /// The protected bank leg survives any number of post/unpost cycles
    /// and every removal attempt.
    #[test]
    fn prop_protection_survives_post_cycles(
        cents in positive_cents(),
        cycles in 0usize..5,
    ) {
        let mut txn = bank_import(cents, cents);
        let protected = txn.protected_entry_ids();
        prop_assert_eq!(protected.len(), 1);

        for _ in 0..cycles {
            txn.post().expect("balanced");
            txn.unpost().expect("posted");
        }

        prop_assert!(matches!(
            txn.remove_entry(protected[0]),
            Err(LedgerError::ProtectedEntry(_))
        ));
        prop_assert!(txn.entry(protected[0]).is_some());
    }

    /// Clearing a 2-entry bank import always leaves exactly the protected
    /// asset leg - never 0 entries, never 2.
    #[test]
    fn prop_clear_preserves_protected(cents in positive_cents()) {
        let mut txn = bank_import(cents, cents);
        txn.clear_entries().expect("draft");

        prop_assert_eq!(txn.entries().len(), 1);
        prop_assert!(txn.entries()[0].account.account_type.is_balance_sheet());
    }

    /// Replacing unprotected entries with a balanced split keeps the
    /// transaction postable.
    #[test]
    fn prop_split_keeps_postability(
        cents in 2i64..100_000_000i64,
        split in 1i64..100,
    ) {
        let first = (cents * split) / 100;
        let first = first.clamp(1, cents - 1);
        let second = cents - first;

        let mut txn = bank_import(cents, cents);
        txn.replace_unprotected_entries(vec![
            EntrySpec::debit(account(AccountType::Expense), eur(first)),
            EntrySpec::debit(account(AccountType::Expense), eur(second)),
        ])
        .expect("draft");

        prop_assert_eq!(txn.entries().len(), 3);
        prop_assert!(txn.post().is_ok());
    }
}
