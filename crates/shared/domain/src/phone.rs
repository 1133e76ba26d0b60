//! Phone value object.

use std::fmt;

use serde::Serialize;

use crate::constants::{is_valid_area_code, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use crate::error::{DomainError, DomainResult, Field};

/// Validated phone number, stored as digits only.
///
/// Equality is over the digits; the grouped `Display` form is presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Phone {
    number: String,
}

impl Phone {
    /// Validate a raw phone number, discarding any non-digit characters.
    ///
    /// # Errors
    /// * `EmptyInput` if the input is blank
    /// * `InvalidLength` unless 10 or 11 digits remain
    /// * `InvalidAreaCode` if the first two digits are not a known area code
    pub fn new(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::EmptyInput(Field::Phone));
        }

        let number: String = raw.chars().filter(char::is_ascii_digit).collect();

        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&number.len()) {
            return Err(DomainError::InvalidLength);
        }

        if !is_valid_area_code(&number[..2]) {
            return Err(DomainError::InvalidAreaCode);
        }

        Ok(Self { number })
    }

    /// Digits-only number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Two-digit area code.
    pub fn area_code(&self) -> &str {
        &self.number[..2]
    }

    /// Whether the number has the 11-digit mobile shape.
    pub fn is_mobile(&self) -> bool {
        self.number.len() == MAX_PHONE_DIGITS
    }
}

impl fmt::Display for Phone {
    /// `(DD) DDDD-DDDD` for landlines, `(DD) DDDDD-DDDD` for mobiles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (area, rest) = self.number.split_at(2);
        let (prefix, line) = rest.split_at(rest.len() - 4);
        write!(f, "({}) {}-{}", area, prefix, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        let phone = Phone::new("(47) 9.9999-1234").unwrap();
        assert_eq!(phone.number(), "47999991234");
        assert_eq!(phone.area_code(), "47");
        assert!(phone.is_mobile());
    }

    #[test]
    fn test_display_landline() {
        let phone = Phone::new("4733334444").unwrap();
        assert_eq!(phone.to_string(), "(47) 3333-4444");
        assert!(!phone.is_mobile());
    }

    #[test]
    fn test_display_mobile() {
        let phone = Phone::new("(47) 9.9999-1234").unwrap();
        assert_eq!(phone.to_string(), "(47) 99999-1234");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(Phone::new(""), Err(DomainError::EmptyInput(Field::Phone)));
        assert_eq!(Phone::new("   "), Err(DomainError::EmptyInput(Field::Phone)));
    }

    #[test]
    fn test_invalid_length() {
        for raw in ["123456789", "119876543210", "abc", "(11) 9999-999"] {
            assert_eq!(Phone::new(raw), Err(DomainError::InvalidLength), "{raw}");
        }
    }

    #[test]
    fn test_invalid_area_code() {
        for raw in ["0199999999", "1099999999", "(20) 99999-1234", "00999991234"] {
            assert_eq!(Phone::new(raw), Err(DomainError::InvalidAreaCode), "{raw}");
        }
    }

    #[test]
    fn test_equality_ignores_formatting() {
        assert_eq!(
            Phone::new("(11) 98765-4321").unwrap(),
            Phone::new("11987654321").unwrap()
        );
        assert_ne!(
            Phone::new("11987654321").unwrap(),
            Phone::new("11987654322").unwrap()
        );
    }
}
