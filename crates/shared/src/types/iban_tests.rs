//! Cross-format IBAN comparison tests.

use std::collections::HashSet;
use std::str::FromStr;

use super::iban::Iban;

#[test]
fn test_hashing_uses_normalized_form() {
    let mut set = HashSet::new();
    set.insert(Iban::parse("NL02 ABNA 0123 4567 89").unwrap());
    assert!(set.contains(&Iban::parse("nl02abna0123456789").unwrap()));
}

#[test]
fn test_from_str_round_trip() {
    let iban = Iban::from_str("CH93 0076 2011 6238 5295 7").unwrap();
    assert_eq!(Iban::from_str(&iban.to_string()).unwrap(), iban);
}

#[test]
fn test_ordering_is_stable() {
    let a = Iban::parse("DE12500105170648489890").unwrap();
    let b = Iban::parse("NL02ABNA0123456789").unwrap();
    assert!(a < b);
}
