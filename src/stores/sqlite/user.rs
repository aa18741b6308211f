//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, Username},
    stores::UserStore,
};

/// Stores users in a SQLite database, keyed by username.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SqliteUserStore {
    /// Register a new user in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUsername] if `username` is already registered,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, username: Username, password_hash: PasswordHash) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO user (username, password_hash) VALUES (?1, ?2)",
                (username.as_str(), password_hash.to_string()),
            )
            .map_err(|error| match error {
                // Code 1555 occurs when a PRIMARY KEY constraint failed.
                // The caller tried to register a name that is already taken.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 1555 => {
                    Error::DuplicateUsername(username.to_string())
                }
                error => error.into(),
            })?;

        Ok(User::new(username, password_hash))
    }

    /// Retrieve the user registered with `username`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no such user exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, username: &Username) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT username, password_hash FROM user WHERE username = :username")?
            .query_row(&[(":username", username.as_str())], Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SqliteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    username TEXT PRIMARY KEY,
                    password_hash TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let username: String = row.get(offset)?;
        let password_hash: String = row.get(offset + 1)?;

        Ok(User::new(
            Username::new(&username),
            PasswordHash::new_unchecked(&password_hash),
        ))
    }
}

#[cfg(test)]
mod sqlite_user_store_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        models::{PasswordHash, Username},
        stores::{UserStore, sqlite::create_stores},
    };

    use super::SqliteUserStore;

    fn get_store() -> SqliteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        let (_, user_store) = create_stores(connection).unwrap();

        user_store
    }

    #[test]
    fn create_user_succeeds() {
        let mut store = get_store();

        let user = store
            .create(
                Username::new("alice"),
                PasswordHash::new_unchecked("notarealhash"),
            )
            .unwrap();

        assert_eq!(user.username(), &Username::new("alice"));
    }

    #[test]
    fn create_user_fails_on_duplicate_username() {
        let mut store = get_store();

        store
            .create(
                Username::new("alice"),
                PasswordHash::new_unchecked("notarealhash"),
            )
            .unwrap();

        let result = store.create(
            Username::new("alice"),
            PasswordHash::new_unchecked("anotherhash"),
        );

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_succeeds_after_create() {
        let mut store = get_store();

        let created = store
            .create(
                Username::new("alice"),
                PasswordHash::new_unchecked("notarealhash"),
            )
            .unwrap();

        let retrieved = store.get(&Username::new("alice")).unwrap();

        assert_eq!(retrieved, created);
    }

    #[test]
    fn get_user_fails_on_unknown_username() {
        let store = get_store();

        assert_eq!(store.get(&Username::new("nobody")), Err(Error::NotFound));
    }
}
