//! Password value object - Domain layer password handling.
//!
//! DDD: Encapsulates password hashing as a domain value object.
//! DRY: Centralized Argon2 configuration.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PASSWORD_HASH_ITERATIONS, PASSWORD_HASH_MEMORY_KIB,
    PASSWORD_HASH_PARALLELISM,
};
use crate::error::{DomainError, DomainResult, Field};

/// Password value object holding only a salted Argon2id hash.
///
/// DDD: Value object - immutable, compared by value.
/// Equality is over the stored hash: two passwords created from the same
/// plain text are NOT equal, because each hash carries a fresh salt.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// Length is counted in Unicode scalar values (`char`s), not bytes or
    /// UTF-16 code units, so an astral emoji counts once.
    ///
    /// # Arguments
    /// * `plain_text` - The raw password (6 to 72 characters)
    ///
    /// # Errors
    /// * `EmptyInput` if the password is blank
    /// * `TooShort` / `TooLong` if the length is out of bounds
    /// * `HashingError` if the hashing backend fails
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.trim().is_empty() {
            return Err(DomainError::EmptyInput(Field::Password));
        }

        let length = plain_text.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(DomainError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(DomainError::TooLong);
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Rebuild a Password from an existing hash (from storage).
    ///
    /// # Errors
    /// Returns `InvalidFormat` if the hash is not a PHC string.
    pub fn from_hash(hash: impl Into<String>) -> DomainResult<Self> {
        let hash = hash.into();
        if PasswordHash::new(&hash).is_err() {
            return Err(DomainError::InvalidFormat(Field::Password));
        }
        Ok(Self { hash })
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// Never fails: blank candidates and backend errors yield `false`.
    pub fn verify(&self, plain_text: &str) -> bool {
        if plain_text.trim().is_empty() {
            return false;
        }

        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        match Self::argon2() {
            Ok(argon2) => argon2.verify_password(plain_text.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Hash a password using Argon2.
    /// DRY: Single hashing implementation.
    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hash failed: {}", e);
                DomainError::HashingError
            })?;
        Ok(hash.to_string())
    }

    /// Get Argon2id instance with the fixed work factor.
    /// DRY: Single configuration point.
    fn argon2() -> DomainResult<Argon2<'static>> {
        let params = Params::new(
            PASSWORD_HASH_MEMORY_KIB,
            PASSWORD_HASH_ITERATIONS,
            PASSWORD_HASH_PARALLELISM,
            None,
        )
        .map_err(|e| {
            tracing::error!("Invalid Argon2 parameters: {}", e);
            DomainError::HashingError
        })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
