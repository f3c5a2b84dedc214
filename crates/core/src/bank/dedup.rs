//! Bank transaction deduplication.
//!
//! A hash-only scheme cannot tell "two real transactions that happen to be
//! identical" from "the same transaction re-fetched". The composite key
//! `(identity_hash, hash_sequence)` can: within one import batch the k-th
//! occurrence of a hash gets sequence k, so identical siblings on the same
//! statement stay distinct while re-fetches collide with their stored row.

use std::collections::HashMap;

use buchfink_shared::types::{BankTransactionId, Iban};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transaction::BankTransaction;
use crate::repository::{BankTransactionRepository, RepositoryError};

/// Composite natural key of a stored bank transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    /// Content hash over the transaction's identifying fields.
    pub hash: String,
    /// 1-based ordinal among content-identical transactions in one batch.
    pub sequence: u32,
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.hash, self.sequence)
    }
}

/// A bank transaction persisted with its identity key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBankTransaction {
    /// Unique identifier of the stored row.
    pub id: BankTransactionId,
    /// IBAN of the own account the transaction was fetched for.
    pub account_iban: Iban,
    /// Composite identity key.
    pub identity: IdentityKey,
    /// The raw bank transaction.
    pub transaction: BankTransaction,
    /// Whether the row has been imported into the ledger.
    ///
    /// Tracked separately from identity so a failed import retries without
    /// re-fetching or re-hashing.
    pub is_imported: bool,
}

/// Result of offering one batch item to the store.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    /// The stored row (existing or freshly inserted).
    pub stored: StoredBankTransaction,
    /// True if the row was not seen before.
    pub is_new: bool,
}

/// Assigns 1-based sequence numbers per distinct hash within one batch.
#[derive(Debug, Default)]
pub struct BatchSequencer {
    counters: HashMap<String, u32>,
}

impl BatchSequencer {
    /// Creates an empty sequencer for a new batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next sequence number for the given hash.
    pub fn next(&mut self, hash: &str) -> u32 {
        let counter = self.counters.entry(hash.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Deduplicating writer for fetched bank transaction batches.
pub struct DedupService;

impl DedupService {
    /// Stores one fetched batch, skipping rows already present.
    ///
    /// Sequence numbers are derived from batch order, so the same statement
    /// re-fetched yields the same keys and zero new rows. Outcomes are
    /// returned in batch order.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; the batch stops at the first error.
    pub fn store_batch<R>(
        repo: &R,
        account_iban: &Iban,
        batch: &[BankTransaction],
    ) -> Result<Vec<DedupOutcome>, RepositoryError>
    where
        R: BankTransactionRepository + ?Sized,
    {
        let mut sequencer = BatchSequencer::new();
        let mut outcomes = Vec::with_capacity(batch.len());

        for transaction in batch {
            let hash = transaction.compute_identity_hash(account_iban);
            let identity = IdentityKey {
                sequence: sequencer.next(&hash),
                hash,
            };

            if let Some(existing) = repo.find_by_identity(&identity)? {
                debug!(identity = %identity, "bank transaction already stored");
                outcomes.push(DedupOutcome {
                    stored: existing,
                    is_new: false,
                });
                continue;
            }

            let stored = StoredBankTransaction {
                id: BankTransactionId::new(),
                account_iban: account_iban.clone(),
                identity,
                transaction: transaction.clone(),
                is_imported: false,
            };
            repo.insert(&stored)?;
            outcomes.push(DedupOutcome {
                stored,
                is_new: true,
            });
        }

        Ok(outcomes)
    }
}
