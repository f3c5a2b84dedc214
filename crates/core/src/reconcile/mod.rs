//! Internal transfer detection and conversion.
//!
//! A bank import initially books every transaction against a category.
//! When the counterparty IBAN turns out to be one of the user's own
//! accounts, the transaction is converted into an internal transfer (or a
//! liability payment) so money moving between own accounts never shows up
//! as income or expense.

pub mod error;
pub mod matching;
pub mod service;
pub mod types;

pub use error::ReconcileError;
pub use matching::{exact_transfer_match, fuzzy_transfer_match};
pub use service::TransferReconciler;
pub use types::{AccountMapping, TransferContext, TransferKind};

/// Metadata key carrying the transfer-identity hash.
pub const META_TRANSFER_HASH: &str = "transfer_hash";
