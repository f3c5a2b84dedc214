//! In-memory repositories and fixtures shared by the scenario tests.

use std::cell::RefCell;

use buchfink_shared::types::{
    AccountId, AccountMappingId, BankTransactionId, Currency, Iban, TransactionId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use buchfink_core::account::{Account, AccountType};
use buchfink_core::bank::{BankTransaction, IdentityKey, StoredBankTransaction};
use buchfink_core::ledger::Transaction;
use buchfink_core::reconcile::AccountMapping;
use buchfink_core::repository::{
    AccountMappingRepository, AccountRepository, BankTransactionRepository, RepositoryError,
    TransactionRepository,
};

/// In-memory chart of accounts.
#[derive(Default)]
pub struct InMemoryAccounts {
    pub accounts: Vec<Account>,
}

impl InMemoryAccounts {
    pub fn with(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }
}

impl AccountRepository for InMemoryAccounts {
    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.iter().find(|a| a.id == id).cloned())
    }

    fn find_by_iban(&self, iban: &Iban) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.iban.as_ref() == Some(iban))
            .cloned())
    }

    fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.account_number == number)
            .cloned())
    }
}

/// In-memory ledger transaction store.
#[derive(Default)]
pub struct InMemoryTransactions {
    pub transactions: RefCell<Vec<Transaction>>,
}

impl InMemoryTransactions {
    pub fn get(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions
            .borrow()
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.transactions.borrow().len()
    }
}

impl TransactionRepository for InMemoryTransactions {
    fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Ok(self.get(id))
    }

    fn find_by_metadata(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self
            .transactions
            .borrow()
            .iter()
            .filter(|t| t.metadata_value(key).and_then(|v| v.as_str()) == Some(value))
            .cloned()
            .collect())
    }

    fn find_by_counterparty_iban(&self, iban: &Iban) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self
            .transactions
            .borrow()
            .iter()
            .filter(|t| t.counterparty_iban() == Some(iban))
            .cloned()
            .collect())
    }

    fn save(&self, transaction: &Transaction) -> Result<(), RepositoryError> {
        let mut transactions = self.transactions.borrow_mut();
        if let Some(existing) = transactions.iter_mut().find(|t| t.id() == transaction.id()) {
            *existing = transaction.clone();
        } else {
            transactions.push(transaction.clone());
        }
        Ok(())
    }
}

/// In-memory IBAN-to-account mapping table.
#[derive(Default)]
pub struct InMemoryMappings {
    pub mappings: Vec<AccountMapping>,
}

impl InMemoryMappings {
    pub fn map(&mut self, iban: Iban, account_id: AccountId) {
        self.mappings.push(AccountMapping {
            id: AccountMappingId::new(),
            iban,
            account_id,
            opening_balance_date: None,
        });
    }
}

impl AccountMappingRepository for InMemoryMappings {
    fn find_by_iban(&self, iban: &Iban) -> Result<Option<AccountMapping>, RepositoryError> {
        Ok(self.mappings.iter().find(|m| &m.iban == iban).cloned())
    }
}

/// In-memory stored bank transaction table.
#[derive(Default)]
pub struct InMemoryBankTransactions {
    pub rows: RefCell<Vec<StoredBankTransaction>>,
}

impl BankTransactionRepository for InMemoryBankTransactions {
    fn find_by_identity(
        &self,
        identity: &IdentityKey,
    ) -> Result<Option<StoredBankTransaction>, RepositoryError> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .find(|r| &r.identity == identity)
            .cloned())
    }

    fn insert(&self, stored: &StoredBankTransaction) -> Result<(), RepositoryError> {
        self.rows.borrow_mut().push(stored.clone());
        Ok(())
    }

    fn mark_imported(&self, id: BankTransactionId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.borrow_mut();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        row.is_imported = true;
        Ok(())
    }
}

// ========== Fixtures ==========

pub fn asset_account(name: &str, iban: Option<&Iban>) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type: AccountType::Asset,
        account_number: "1200".to_string(),
        iban: iban.cloned(),
        default_currency: Currency::Eur,
        is_active: true,
        parent_id: None,
    }
}

pub fn liability_account(name: &str) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type: AccountType::Liability,
        account_number: "2100".to_string(),
        iban: None,
        default_currency: Currency::Eur,
        is_active: true,
        parent_id: None,
    }
}

pub fn expense_account(name: &str) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type: AccountType::Expense,
        account_number: "4000".to_string(),
        iban: None,
        default_currency: Currency::Eur,
        is_active: true,
        parent_id: None,
    }
}

pub fn income_account(name: &str) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        account_type: AccountType::Income,
        account_number: "8000".to_string(),
        iban: None,
        default_currency: Currency::Eur,
        is_active: true,
        parent_id: None,
    }
}

pub fn checking_iban() -> Iban {
    Iban::parse("DE12500105170648489890").unwrap()
}

pub fn savings_iban() -> Iban {
    Iban::parse("DE89370400440532013000").unwrap()
}

pub fn bank_txn(amount: Decimal, purpose: &str, counterparty_iban: Option<&Iban>) -> BankTransaction {
    BankTransaction {
        booking_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        value_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        amount,
        currency: Currency::Eur,
        purpose: purpose.to_string(),
        applicant_name: "Counterparty".to_string(),
        applicant_iban: counterparty_iban.cloned(),
        bank_reference: "REF".to_string(),
    }
}
