//! This file defines a user of the ledger and the username newtype that
//! transactions reference as their owner.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for usernames.
///
/// This helps disambiguate the owner of a transaction from other strings
/// such as categories and descriptions, leading to better compile time
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a username from a string.
    pub fn new(username: &str) -> Self {
        Self(username.to_owned())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the ledger.
///
/// Each transaction's owner references a user by username; the SQLite
/// backend enforces the reference with a foreign key. Authentication flows
/// (login, sessions) are a collaborator concern and live outside this
/// crate, which only stores the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    username: Username,
    password_hash: PasswordHash,
}

impl User {
    /// Create a user record from its parts.
    ///
    /// To register a user, pass the parts to
    /// [UserStore::create](crate::stores::UserStore::create) instead.
    pub fn new(username: Username, password_hash: PasswordHash) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    /// The unique name the user registered with.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The user's credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}
