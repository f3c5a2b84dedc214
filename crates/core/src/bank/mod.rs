//! Bank transaction identity, deduplication, and import.
//!
//! Bank feeds re-deliver the same statement lines on every sync; this
//! module recognizes previously-seen transactions by content hash while
//! still keeping truly identical siblings apart, and turns stored rows
//! into ledger transactions.

pub mod dedup;
pub mod import;
pub mod transaction;

pub use dedup::{DedupOutcome, DedupService, IdentityKey, StoredBankTransaction};
pub use import::{BankImportService, ImportError, ImportRequest};
pub use transaction::BankTransaction;
