//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Password
// =============================================================================

/// Minimum password length requirement (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length accepted (in characters)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Argon2 memory cost in KiB
pub const PASSWORD_HASH_MEMORY_KIB: u32 = 19_456;

/// Argon2 iteration count
pub const PASSWORD_HASH_ITERATIONS: u32 = 2;

/// Argon2 degree of parallelism
pub const PASSWORD_HASH_PARALLELISM: u32 = 1;

// =============================================================================
// Phone
// =============================================================================

/// Shortest accepted phone number (area code + 8-digit landline)
pub const MIN_PHONE_DIGITS: usize = 10;

/// Longest accepted phone number (area code + 9-digit mobile)
pub const MAX_PHONE_DIGITS: usize = 11;

/// Area codes (DDD) accepted as the first two digits of a phone number
pub const VALID_AREA_CODES: &[&str] = &[
    "11", "21", "31", "41", "51", "61", "71", "81", "91",
    "12", "22", "32", "42", "52", "62", "72", "82", "92",
    "13", "23", "33", "43", "53", "63", "73", "83", "93",
    "14", "24", "34", "44", "54", "64", "74", "84", "94",
    "15", "25", "35", "45", "55", "65", "75", "85", "95",
    "16", "26", "36", "46", "56", "66", "76", "86", "96",
    "17", "27", "37", "47", "57", "67", "77", "87", "97",
    "18", "28", "38", "48", "58", "68", "78", "88", "98",
    "19", "29", "39", "49", "59", "69", "79", "89", "99",
];

/// Check if an area code is in the allow-list
pub fn is_valid_area_code(code: &str) -> bool {
    VALID_AREA_CODES.contains(&code)
}

// =============================================================================
// Verification Token
// =============================================================================

/// Number of digits in a verification token
pub const VERIFICATION_TOKEN_LENGTH: usize = 6;

/// Smallest verification token value
pub const MIN_VERIFICATION_TOKEN: u32 = 100_000;

/// Largest verification token value
pub const MAX_VERIFICATION_TOKEN: u32 = 999_999;
