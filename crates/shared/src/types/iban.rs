//! IBAN handling in normalized electronic format.
//!
//! Bank interfaces deliver IBANs in wildly inconsistent shapes (paper format
//! with spaces, lowercase, surrounding whitespace). Everything downstream
//! compares IBANs for equality, so normalization happens once, at the edge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from IBAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    /// The input is empty after normalization.
    #[error("IBAN is empty")]
    Empty,
    /// The input does not match the IBAN shape.
    #[error("Malformed IBAN: {0}")]
    Malformed(String),
}

/// An IBAN in normalized electronic format (uppercase, no spaces).
///
/// Equality and hashing operate on the normalized form, so
/// `"de12 5001 0517 0648 4898 90"` and `"DE12500105170648489890"`
/// compare equal once parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iban(String);

impl Iban {
    /// Parses and normalizes an IBAN.
    ///
    /// Normalization strips surrounding whitespace and inner spaces and
    /// uppercases the result. The shape check covers the country prefix
    /// (2 letters), check digits (2 digits), and a 11-30 character
    /// alphanumeric BBAN. Check-digit verification is left to the banking
    /// client that sourced the value.
    ///
    /// # Errors
    ///
    /// Returns `IbanError` if the input is empty or malformed.
    pub fn parse(input: &str) -> Result<Self, IbanError> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if normalized.is_empty() {
            return Err(IbanError::Empty);
        }

        if !Self::has_valid_shape(&normalized) {
            return Err(IbanError::Malformed(normalized));
        }

        Ok(Self(normalized))
    }

    fn has_valid_shape(s: &str) -> bool {
        if s.len() < 15 || s.len() > 34 {
            return false;
        }
        let bytes = s.as_bytes();
        bytes[0].is_ascii_uppercase()
            && bytes[1].is_ascii_uppercase()
            && bytes[2].is_ascii_digit()
            && bytes[3].is_ascii_digit()
            && bytes[4..].iter().all(u8::is_ascii_alphanumeric)
    }

    /// Returns the normalized electronic format.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iban {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
