//! This file defines the type that handles credential hashing.
//! `PasswordHash` wraps a bcrypt hash and verifies raw passwords against it.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
///
/// The ledger never stores raw passwords; user records hold this type
/// instead. Verifying a password against the hash is the only supported
/// credential check, login and session handling are out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a raw password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed
    /// to verify a password. A value of at least 12 is recommended. Pass in
    /// [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    /// This function will return [Error::HashingError] if the password could
    /// not be hashed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid bcrypt
    /// hash, e.g. one restored from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use super::PasswordHash;

    // The minimum bcrypt cost, used to keep the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = "correcthorsebatterystaple";
        let wrong_password = "the_wrong_password";

        let hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();

        assert!(hash.verify(password).unwrap());
        assert!(!hash.verify(wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = "turkeysgogobblegobble";

        let hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();
        let dupe_hash = PasswordHash::from_raw_password(password, TEST_COST).unwrap();

        assert_ne!(hash, dupe_hash);
    }

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert!(hash.verify("okon").unwrap());
    }
}
