//! Email value object.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{DomainError, DomainResult, Field};

/// Local part, `@`, then a dotted domain ending in a 2+ letter label.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validated, normalized (trimmed, lower-cased) email address.
///
/// DDD: Value object - immutable, compared by its normalized address, so
/// differently-cased inputs are equal and collide in hash maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email {
    address: String,
}

impl Email {
    /// Validate and normalize a raw email address.
    ///
    /// # Errors
    /// * `EmptyInput` if the input is blank
    /// * `InvalidFormat` if the trimmed input is not a well-formed address
    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyInput(Field::Email));
        }

        // The regex crate has no lookahead, so the dot rules are checked here.
        if trimmed.starts_with('.') || trimmed.contains("..") || !EMAIL_PATTERN.is_match(trimmed) {
            return Err(DomainError::InvalidFormat(Field::Email));
        }

        Ok(Self {
            address: trimmed.to_lowercase(),
        })
    }

    /// Normalized address.
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Domain part of the address (after `@`).
    pub fn domain(&self) -> &str {
        self.address
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}
