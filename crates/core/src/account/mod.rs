//! Chart-of-accounts descriptors.
//!
//! Account hierarchy maintenance (parent/child links, depth limits) lives in
//! the application layer; this module only carries the descriptor the ledger
//! needs to apply type-driven bookkeeping rules.

pub mod types;

pub use types::{Account, AccountType};
