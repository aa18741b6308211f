//! Defines the user store trait.

use crate::{
    Error,
    models::{PasswordHash, User, Username},
};

/// Handles the registration and retrieval of users.
pub trait UserStore {
    /// Register a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if `username` is already
    /// registered. The store is unchanged and the caller should not retry
    /// with the same name.
    fn create(&mut self, username: Username, password_hash: PasswordHash) -> Result<User, Error>;

    /// Retrieve the user registered with `username`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such user exists.
    fn get(&self, username: &Username) -> Result<User, Error>;
}
