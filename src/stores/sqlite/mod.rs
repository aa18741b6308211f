//! Contains the SQLite backed store implementations and a convenience
//! function for creating them from a single connection.

pub mod transaction;
pub mod user;

pub use transaction::SqliteTransactionStore;
pub use user::SqliteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// Creates the SQLite backed stores for `db_connection`.
///
/// This function will modify the database by adding the tables for the
/// domain models and enabling foreign key enforcement.
pub fn create_stores(
    db_connection: Connection,
) -> Result<(SqliteTransactionStore, SqliteUserStore), Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let transaction_store = SqliteTransactionStore::new(connection.clone());
    let user_store = SqliteUserStore::new(connection);

    Ok((transaction_store, user_store))
}
