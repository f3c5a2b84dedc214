//! Property-based tests for the entry-construction rules.

use buchfink_shared::types::{AccountId, Currency, Money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rules::EntryRuleService;
use super::types::{EntryDirection, EntryType, PreservedLeg};
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

fn direction_strategy() -> impl Strategy<Value = EntryDirection> {
    prop_oneof![Just(EntryDirection::Expense), Just(EntryDirection::Income)]
}

fn preserved_strategy() -> impl Strategy<Value = PreservedLeg> {
    prop_oneof![
        Just(PreservedLeg::None),
        Just(PreservedLeg::Source),
        Just(PreservedLeg::Destination),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// `simple` always returns one debit and one credit of the same
    /// amount, with the order fixed by direction.
    #[test]
    fn prop_simple_is_balanced_pair(
        cents in 1i64..100_000_000i64,
        direction in direction_strategy(),
    ) {
        let payment = account(AccountType::Asset);
        let category = account(match direction {
            EntryDirection::Expense => AccountType::Expense,
            EntryDirection::Income => AccountType::Income,
        });

        let specs = EntryRuleService::simple(&payment, &category, eur(cents), direction)
            .expect("valid intent");

        prop_assert_eq!(specs.len(), 2);
        prop_assert_eq!(specs[0].entry_type, EntryType::Debit);
        prop_assert_eq!(specs[1].entry_type, EntryType::Credit);
        prop_assert_eq!(specs[0].amount, specs[1].amount);

        match direction {
            EntryDirection::Expense => {
                prop_assert_eq!(specs[0].account.id, category.id);
                prop_assert_eq!(specs[1].account.id, payment.id);
            }
            EntryDirection::Income => {
                prop_assert_eq!(specs[0].account.id, payment.id);
                prop_assert_eq!(specs[1].account.id, category.id);
            }
        }
    }

    /// A preserved transfer leg is never rebuilt, and the remaining specs
    /// never post to the preserved account.
    #[test]
    fn prop_internal_transfer_omits_preserved_leg(
        cents in 1i64..100_000_000i64,
        preserved in preserved_strategy(),
    ) {
        let source = account(AccountType::Asset);
        let destination = account(AccountType::Asset);

        let specs = EntryRuleService::internal_transfer(
            &source,
            &destination,
            eur(cents),
            preserved,
        )
        .expect("valid intent");

        match preserved {
            PreservedLeg::None => prop_assert_eq!(specs.len(), 2),
            PreservedLeg::Source => {
                prop_assert_eq!(specs.len(), 1);
                prop_assert!(specs.iter().all(|s| s.account.id != source.id));
            }
            PreservedLeg::Destination => {
                prop_assert_eq!(specs.len(), 1);
                prop_assert!(specs.iter().all(|s| s.account.id != destination.id));
            }
        }
    }

    /// The liability leg is always present; only the asset leg can be
    /// omitted.
    #[test]
    fn prop_liability_payment_always_books_liability(
        cents in 1i64..100_000_000i64,
        is_payment_out in any::<bool>(),
        asset_preserved in any::<bool>(),
    ) {
        let asset = account(AccountType::Asset);
        let liability = account(AccountType::Liability);

        let specs = EntryRuleService::liability_payment(
            &asset,
            &liability,
            eur(cents),
            is_payment_out,
            asset_preserved,
        )
        .expect("valid intent");

        prop_assert!(specs.iter().any(|s| s.account.id == liability.id));
        let expected_len = if asset_preserved { 1 } else { 2 };
        prop_assert_eq!(specs.len(), expected_len);

        let liability_spec = specs.iter().find(|s| s.account.id == liability.id).unwrap();
        let expected_side = if is_payment_out { EntryType::Debit } else { EntryType::Credit };
        prop_assert_eq!(liability_spec.entry_type, expected_side);
    }

    /// Sign convention: negative amounts are expenses, everything else is
    /// income.
    #[test]
    fn prop_direction_follows_sign(cents in -100_000_000i64..100_000_000i64) {
        let direction = EntryRuleService::determine_direction_from_amount(&eur(cents));
        if cents < 0 {
            prop_assert_eq!(direction, EntryDirection::Expense);
        } else {
            prop_assert_eq!(direction, EntryDirection::Income);
        }
    }
}
