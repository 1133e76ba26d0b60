//! Verification tokens and their generators.
//!
//! A token is a 6-digit numeric code gating sensitive account changes. The
//! aggregate never draws randomness on its own; a [`TokenGenerator`] is passed
//! to every operation that issues a token.

use std::fmt;
use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::constants::{MAX_VERIFICATION_TOKEN, MIN_VERIFICATION_TOKEN, VERIFICATION_TOKEN_LENGTH};
use crate::error::{DomainError, DomainResult, Field};

/// Six ASCII digits, numerically in `[100000, 999999]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Build a token from its numeric value.
    ///
    /// # Errors
    /// Returns `InvalidFormat` if the value is outside the token range.
    pub fn from_number(value: u32) -> DomainResult<Self> {
        if !(MIN_VERIFICATION_TOKEN..=MAX_VERIFICATION_TOKEN).contains(&value) {
            return Err(DomainError::InvalidFormat(Field::VerificationToken));
        }
        Ok(Self(value.to_string()))
    }

    /// Parse a stored token.
    ///
    /// # Errors
    /// * `EmptyInput` if the input is blank
    /// * `InvalidFormat` unless it is exactly six digits within range
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::EmptyInput(Field::VerificationToken));
        }
        if raw.len() != VERIFICATION_TOKEN_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidFormat(Field::VerificationToken));
        }
        let value = raw
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidFormat(Field::VerificationToken))?;
        Self::from_number(value)
    }

    /// Whether a client-supplied value matches this token (ASCII case-insensitive).
    pub fn matches(&self, supplied: &str) -> bool {
        self.0.eq_ignore_ascii_case(supplied)
    }

    /// Numeric value of the token.
    pub fn value(&self) -> u32 {
        // Only ever constructed from an in-range number.
        self.0.parse().unwrap_or(MIN_VERIFICATION_TOKEN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Draw a replacement for `current`, guaranteed to differ from it.
    ///
    /// A draw equal to `current` is bumped to the next value, wrapping at the
    /// top of the range.
    pub(crate) fn rotate<G>(current: &Self, tokens: &G) -> Self
    where
        G: TokenGenerator + ?Sized,
    {
        let next = tokens.generate();
        if next != *current {
            return next;
        }
        let value = current.value();
        let bumped = if value >= MAX_VERIFICATION_TOKEN {
            MIN_VERIFICATION_TOKEN
        } else {
            value + 1
        };
        Self(bumped.to_string())
    }
}

impl fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh verification tokens.
pub trait TokenGenerator: Send + Sync {
    /// Produce a token drawn uniformly from the token range.
    fn generate(&self) -> VerificationToken;
}

fn draw<R: Rng + ?Sized>(rng: &mut R) -> VerificationToken {
    VerificationToken(
        rng.gen_range(MIN_VERIFICATION_TOKEN..=MAX_VERIFICATION_TOKEN)
            .to_string(),
    )
}

/// Tokens drawn from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTokenGenerator;

impl TokenGenerator for OsTokenGenerator {
    fn generate(&self) -> VerificationToken {
        draw(&mut OsRng)
    }
}

/// Deterministic tokens from a seeded PRNG, for reproducible runs and tests.
#[derive(Debug)]
pub struct SeededTokenGenerator {
    rng: Mutex<StdRng>,
}

impl SeededTokenGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TokenGenerator for SeededTokenGenerator {
    fn generate(&self) -> VerificationToken {
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        draw(&mut *rng)
    }
}
