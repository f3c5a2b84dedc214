//! Account data types.

use buchfink_shared::types::{AccountId, Currency, Iban};
use serde::{Deserialize, Serialize};

/// Account type classification.
///
/// Determines the bookkeeping role an account can play:
/// - Asset/Liability accounts carry the bank-statement side of imported
///   transactions and appear on the balance sheet.
/// - Income/Expense accounts carry the category side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account (bank accounts, cash).
    Asset,
    /// Liability account (credit cards, loans).
    Liability,
    /// Equity account (opening balances).
    Equity,
    /// Income category account.
    Income,
    /// Expense category account.
    Expense,
}

impl AccountType {
    /// Returns true for balance-sheet accounts (Asset, Liability).
    ///
    /// These are the account types whose journal entries mirror a bank
    /// statement line and are therefore protected on imported transactions.
    #[must_use]
    pub const fn is_balance_sheet(&self) -> bool {
        matches!(self, Self::Asset | Self::Liability)
    }

    /// Returns true for result accounts (Income, Expense).
    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Liability => write!(f, "liability"),
            Self::Equity => write!(f, "equity"),
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A chart-of-accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Internal account number.
    pub account_number: String,
    /// IBAN, when the account mirrors a real bank account.
    pub iban: Option<Iban>,
    /// Default currency for amounts on this account.
    pub default_currency: Currency,
    /// Whether the account is active.
    pub is_active: bool,
    /// Parent account in the hierarchy, if any.
    pub parent_id: Option<AccountId>,
}
