//! Stateless entry-construction rules for common bookkeeping patterns.
//!
//! Pure functions mapping business intent (expense, income, category swap,
//! transfer, liability payment) to the entry specs to add. No persistence,
//! no randomness; designed to be unit-tested without any infrastructure.

use buchfink_shared::types::Money;

use super::error::LedgerError;
use super::types::{EntryDirection, EntrySpec, PreservedLeg};
use crate::account::{Account, AccountType};

/// Stateless service producing entry specs from business intent.
pub struct EntryRuleService;

impl EntryRuleService {
    /// Builds the two legs of a simple expense or income booking.
    ///
    /// Expense: debit the category, credit the payment account.
    /// Income: debit the payment account, credit the category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountType` unless the payment account is an
    /// asset/liability and the category account matches the direction;
    /// `ZeroAmount`/`NegativeAmount` unless the amount is positive.
    pub fn simple(
        payment_account: &Account,
        category_account: &Account,
        amount: Money,
        direction: EntryDirection,
    ) -> Result<Vec<EntrySpec>, LedgerError> {
        Self::require_positive(&amount)?;
        Self::require_payment_account(payment_account)?;
        Self::require_category_for(category_account, direction)?;

        let specs = match direction {
            EntryDirection::Expense => vec![
                EntrySpec::debit(category_account.clone(), amount),
                EntrySpec::credit(payment_account.clone(), amount),
            ],
            EntryDirection::Income => vec![
                EntrySpec::debit(payment_account.clone(), amount),
                EntrySpec::credit(category_account.clone(), amount),
            ],
        };
        Ok(specs)
    }

    /// Rebuilds the category leg when a transaction is recategorized.
    ///
    /// The side of the category leg follows the new category's type:
    /// expense categories are debited, income categories are credited.
    /// When `payment_preserved` is set (the payment leg is protected and
    /// already present) the payment-side spec is omitted so it is not
    /// duplicated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountType` unless the new category is an
    /// income/expense account and the payment account an asset/liability;
    /// `ZeroAmount`/`NegativeAmount` unless the amount is positive.
    pub fn category_swap(
        new_category: &Account,
        payment_account: &Account,
        amount: Money,
        payment_preserved: bool,
    ) -> Result<Vec<EntrySpec>, LedgerError> {
        Self::require_positive(&amount)?;
        Self::require_payment_account(payment_account)?;

        let direction = match new_category.account_type {
            AccountType::Expense => EntryDirection::Expense,
            AccountType::Income => EntryDirection::Income,
            _ => {
                return Err(LedgerError::InvalidAccountType {
                    account_id: new_category.id,
                    expected: "income or expense category",
                    actual: new_category.account_type,
                });
            }
        };

        let mut specs = Vec::with_capacity(2);
        match direction {
            EntryDirection::Expense => {
                specs.push(EntrySpec::debit(new_category.clone(), amount));
                if !payment_preserved {
                    specs.push(EntrySpec::credit(payment_account.clone(), amount));
                }
            }
            EntryDirection::Income => {
                specs.push(EntrySpec::credit(new_category.clone(), amount));
                if !payment_preserved {
                    specs.push(EntrySpec::debit(payment_account.clone(), amount));
                }
            }
        }
        Ok(specs)
    }

    /// Builds the legs of a transfer between two own asset accounts:
    /// debit the destination, credit the source.
    ///
    /// The preserved leg, if any, is omitted: a bank-imported transfer
    /// already carries the statement leg of one of the two accounts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountType` unless both accounts are assets;
    /// `ZeroAmount`/`NegativeAmount` unless the amount is positive.
    pub fn internal_transfer(
        source: &Account,
        destination: &Account,
        amount: Money,
        preserved: PreservedLeg,
    ) -> Result<Vec<EntrySpec>, LedgerError> {
        Self::require_positive(&amount)?;
        Self::require_asset(source)?;
        Self::require_asset(destination)?;

        let mut specs = Vec::with_capacity(2);
        if preserved != PreservedLeg::Destination {
            specs.push(EntrySpec::debit(destination.clone(), amount));
        }
        if preserved != PreservedLeg::Source {
            specs.push(EntrySpec::credit(source.clone(), amount));
        }
        Ok(specs)
    }

    /// Builds the legs of a payment against a liability account.
    ///
    /// `is_payment_out` means money leaves the asset to reduce the debt:
    /// debit the liability, credit the asset. Otherwise the liability is
    /// drawn on: debit the asset, credit the liability. The asset leg is
    /// omitted when preserved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountType` unless the accounts have the named
    /// types; `ZeroAmount`/`NegativeAmount` unless the amount is positive.
    pub fn liability_payment(
        asset: &Account,
        liability: &Account,
        amount: Money,
        is_payment_out: bool,
        asset_preserved: bool,
    ) -> Result<Vec<EntrySpec>, LedgerError> {
        Self::require_positive(&amount)?;
        Self::require_asset(asset)?;
        if liability.account_type != AccountType::Liability {
            return Err(LedgerError::InvalidAccountType {
                account_id: liability.id,
                expected: "liability account",
                actual: liability.account_type,
            });
        }

        let mut specs = Vec::with_capacity(2);
        if is_payment_out {
            specs.push(EntrySpec::debit(liability.clone(), amount));
            if !asset_preserved {
                specs.push(EntrySpec::credit(asset.clone(), amount));
            }
        } else {
            if !asset_preserved {
                specs.push(EntrySpec::debit(asset.clone(), amount));
            }
            specs.push(EntrySpec::credit(liability.clone(), amount));
        }
        Ok(specs)
    }

    /// Derives the bookkeeping direction from a signed bank amount.
    ///
    /// Negative means money left the account (expense); non-negative means
    /// money arrived (income). This sign convention is the single source of
    /// truth for every caller that turns a raw bank amount into a
    /// direction.
    #[must_use]
    pub fn determine_direction_from_amount(amount: &Money) -> EntryDirection {
        if amount.is_negative() {
            EntryDirection::Expense
        } else {
            EntryDirection::Income
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

    fn require_payment_account(account: &Account) -> Result<(), LedgerError> {
        if account.account_type.is_balance_sheet() {
            Ok(())
        } else {
            Err(LedgerError::InvalidAccountType {
                account_id: account.id,
                expected: "asset or liability payment account",
                actual: account.account_type,
            })
        }
    }

    fn require_asset(account: &Account) -> Result<(), LedgerError> {
        if account.account_type == AccountType::Asset {
            Ok(())
        } else {
            Err(LedgerError::InvalidAccountType {
                account_id: account.id,
                expected: "asset account",
                actual: account.account_type,
            })
        }
    }

    fn require_category_for(
        account: &Account,
        direction: EntryDirection,
    ) -> Result<(), LedgerError> {
        let matches = match direction {
            EntryDirection::Expense => account.account_type == AccountType::Expense,
            EntryDirection::Income => account.account_type == AccountType::Income,
        };
        if matches {
            Ok(())
        } else {
            Err(LedgerError::InvalidAccountType {
                account_id: account.id,
                expected: match direction {
                    EntryDirection::Expense => "expense category",
                    EntryDirection::Income => "income category",
                },
                actual: account.account_type,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buchfink_shared::types::{AccountId, Currency};
    use rust_decimal_macros::dec;

    use crate::ledger::types::EntryType;

    fn account(name: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            name: name.to_string(),
            account_type,
            account_number: "1000".to_string(),
            iban: None,
            default_currency: Currency::Eur,
            is_active: true,
            parent_id: None,
        }
    }

    fn eur(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::Eur)
    }

    #[test]
    fn test_simple_expense_order() {
        let checking = account("Checking", AccountType::Asset);
        let groceries = account("Groceries", AccountType::Expense);

        let specs =
            EntryRuleService::simple(&checking, &groceries, eur(dec!(45.67)), EntryDirection::Expense)
                .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, groceries.id);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, checking.id);
    }

    #[test]
    fn test_simple_income_order() {
        let checking = account("Checking", AccountType::Asset);
        let salary = account("Salary", AccountType::Income);

        let specs =
            EntryRuleService::simple(&checking, &salary, eur(dec!(3200)), EntryDirection::Income)
                .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, checking.id);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, salary.id);
    }

    #[test]
    fn test_simple_rejects_category_payment_account() {
        let groceries = account("Groceries", AccountType::Expense);
        let restaurants = account("Restaurants", AccountType::Expense);

        let result = EntryRuleService::simple(
            &groceries,
            &restaurants,
            eur(dec!(10)),
            EntryDirection::Expense,
        );
        assert!(matches!(result, Err(LedgerError::InvalidAccountType { .. })));
    }

    #[test]
    fn test_simple_rejects_direction_mismatch() {
        let checking = account("Checking", AccountType::Asset);
        let salary = account("Salary", AccountType::Income);

        let result =
            EntryRuleService::simple(&checking, &salary, eur(dec!(10)), EntryDirection::Expense);
        assert!(matches!(result, Err(LedgerError::InvalidAccountType { .. })));
    }

    #[test]
    fn test_simple_rejects_zero_amount() {
        let checking = account("Checking", AccountType::Asset);
        let groceries = account("Groceries", AccountType::Expense);

        let result = EntryRuleService::simple(
            &checking,
            &groceries,
            Money::zero(Currency::Eur),
            EntryDirection::Expense,
        );
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn test_category_swap_preserving_payment() {
        let checking = account("Checking", AccountType::Asset);
        let restaurants = account("Restaurants", AccountType::Expense);

        let specs =
            EntryRuleService::category_swap(&restaurants, &checking, eur(dec!(45.67)), true)
                .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, restaurants.id);
    }

    #[test]
    fn test_category_swap_rebuilding_payment() {
        let checking = account("Checking", AccountType::Asset);
        let restaurants = account("Restaurants", AccountType::Expense);

        let specs =
            EntryRuleService::category_swap(&restaurants, &checking, eur(dec!(45.67)), false)
                .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, checking.id);
    }

    #[test]
    fn test_category_swap_income_category_credits() {
        let checking = account("Checking", AccountType::Asset);
        let salary = account("Salary", AccountType::Income);

        let specs = EntryRuleService::category_swap(&salary, &checking, eur(dec!(100)), true)
            .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Credit);
        assert_eq!(specs[0].account.id, salary.id);
    }

    #[test]
    fn test_category_swap_rejects_non_category() {
        let checking = account("Checking", AccountType::Asset);
        let savings = account("Savings", AccountType::Asset);

        let result = EntryRuleService::category_swap(&savings, &checking, eur(dec!(10)), true);
        assert!(matches!(result, Err(LedgerError::InvalidAccountType { .. })));
    }

    #[test]
    fn test_internal_transfer_both_legs() {
        let checking = account("Checking", AccountType::Asset);
        let savings = account("Savings", AccountType::Asset);

        let specs = EntryRuleService::internal_transfer(
            &checking,
            &savings,
            eur(dec!(500)),
            PreservedLeg::None,
        )
        .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, savings.id);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, checking.id);
    }

    #[test]
    fn test_internal_transfer_source_preserved() {
        let checking = account("Checking", AccountType::Asset);
        let savings = account("Savings", AccountType::Asset);

        let specs = EntryRuleService::internal_transfer(
            &checking,
            &savings,
            eur(dec!(500)),
            PreservedLeg::Source,
        )
        .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, savings.id);
    }

    #[test]
    fn test_internal_transfer_destination_preserved() {
        let checking = account("Checking", AccountType::Asset);
        let savings = account("Savings", AccountType::Asset);

        let specs = EntryRuleService::internal_transfer(
            &checking,
            &savings,
            eur(dec!(500)),
            PreservedLeg::Destination,
        )
        .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Credit);
        assert_eq!(specs[0].account.id, checking.id);
    }

    #[test]
    fn test_internal_transfer_rejects_non_asset() {
        let checking = account("Checking", AccountType::Asset);
        let card = account("Credit Card", AccountType::Liability);

        let result = EntryRuleService::internal_transfer(
            &checking,
            &card,
            eur(dec!(500)),
            PreservedLeg::None,
        );
        assert!(matches!(result, Err(LedgerError::InvalidAccountType { .. })));
    }

    #[test]
    fn test_liability_payment_out() {
        let checking = account("Checking", AccountType::Asset);
        let card = account("Credit Card", AccountType::Liability);

        let specs =
            EntryRuleService::liability_payment(&checking, &card, eur(dec!(250)), true, false)
                .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, card.id);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, checking.id);
    }

    #[test]
    fn test_liability_payment_out_asset_preserved() {
        let checking = account("Checking", AccountType::Asset);
        let card = account("Credit Card", AccountType::Liability);

        let specs =
            EntryRuleService::liability_payment(&checking, &card, eur(dec!(250)), true, true)
                .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, card.id);
    }

    #[test]
    fn test_liability_draw() {
        let checking = account("Checking", AccountType::Asset);
        let card = account("Credit Card", AccountType::Liability);

        let specs =
            EntryRuleService::liability_payment(&checking, &card, eur(dec!(80)), false, false)
                .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].entry_type, EntryType::Debit);
        assert_eq!(specs[0].account.id, checking.id);
        assert_eq!(specs[1].entry_type, EntryType::Credit);
        assert_eq!(specs[1].account.id, card.id);
    }

    #[test]
    fn test_liability_draw_asset_preserved() {
        let checking = account("Checking", AccountType::Asset);
        let card = account("Credit Card", AccountType::Liability);

        let specs =
            EntryRuleService::liability_payment(&checking, &card, eur(dec!(80)), false, true)
                .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].entry_type, EntryType::Credit);
        assert_eq!(specs[0].account.id, card.id);
    }

    #[test]
    fn test_direction_from_amount() {
        assert_eq!(
            EntryRuleService::determine_direction_from_amount(&eur(dec!(-45.67))),
            EntryDirection::Expense
        );
        assert_eq!(
            EntryRuleService::determine_direction_from_amount(&eur(dec!(3200))),
            EntryDirection::Income
        );
        assert_eq!(
            EntryRuleService::determine_direction_from_amount(&Money::zero(Currency::Eur)),
            EntryDirection::Income
        );
    }
}
