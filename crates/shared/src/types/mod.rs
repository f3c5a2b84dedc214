//! Common types used across the application.

pub mod iban;
pub mod id;
pub mod money;

pub use iban::Iban;
pub use id::*;
pub use money::{Currency, Money, MoneyError};

#[cfg(test)]
mod iban_tests;
